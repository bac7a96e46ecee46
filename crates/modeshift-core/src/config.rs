// ── Runtime connection configuration ──
//
// These types describe *how* to reach a vManage controller and how to pace
// bulk work. They never touch disk: the CLI builds a `ControllerConfig`
// from flags and profiles and hands it in.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use modeshift_api::{ManagerClient, TlsMode, TransportConfig};

use crate::error::CoreError;

pub const DEFAULT_PORT: u16 = 8443;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PACING: Duration = Duration::from_secs(5);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab controllers). Opt-in only.
    DangerAcceptInvalid,
}

/// Configuration for one controller session.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller management address.
    pub address: IpAddr,
    /// HTTPS port (8443 on most deployments).
    pub port: u16,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Upper bound for every HTTP request.
    pub timeout: Duration,
    /// Delay between devices in bulk runs.
    pub pacing: Duration,
    /// Directory that relative report filenames resolve against.
    pub output_dir: PathBuf,
}

impl ControllerConfig {
    pub fn new(address: IpAddr) -> Self {
        Self {
            address,
            port: DEFAULT_PORT,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            pacing: DEFAULT_PACING,
            output_dir: PathBuf::from("."),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }

    /// Build the HTTP client for this controller.
    pub fn client(&self) -> Result<ManagerClient, CoreError> {
        let url = ManagerClient::controller_url(&self.address.to_string(), self.port)?;
        Ok(ManagerClient::new(url, &self.transport())?)
    }
}

/// Validate a controller address typed by a user. IPv4 or IPv6 only.
pub fn parse_controller_address(input: &str) -> Result<IpAddr, CoreError> {
    input
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidAddress {
            input: input.to_owned(),
        })
}
