//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text
//! and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use modeshift_config::ConfigError;
use modeshift_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PARTIAL: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(modeshift::connection_failed),
        help(
            "Check that the controller is reachable on its HTTPS port.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("TLS certificate verification failed for {url}")]
    #[diagnostic(
        code(modeshift::tls_error),
        help(
            "Controllers usually ship a self-signed certificate.\n\
             Pass its CA with --ca-cert, or use --insecure (-k) to skip verification."
        )
    )]
    TlsError { url: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(modeshift::timeout),
        help("Increase the limit with --timeout or check controller load.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(modeshift::auth_failed),
        help(
            "Check the username and password.\n\
             Password sources, in order: MODESHIFT_PASSWORD, the system keyring,\n\
             the profile's `password`, then an interactive prompt."
        )
    )]
    AuthFailed { message: String },

    // ── Controller responses ─────────────────────────────────────────
    #[error("Controller returned HTTP {status} for {path}")]
    #[diagnostic(code(modeshift::api_error))]
    Api { status: u16, path: String },

    #[error("Unexpected controller response: {message}")]
    #[diagnostic(code(modeshift::malformed_response))]
    MalformedResponse { message: String },

    #[error("No managed device with system IP {system_ip}")]
    #[diagnostic(
        code(modeshift::not_found),
        help("Run: modeshift list --mode template (or --mode cli) to see system IPs")
    )]
    DeviceNotFound { system_ip: String },

    // ── Device operations ────────────────────────────────────────────
    #[error("{operation} failed for {device}: {detail}")]
    #[diagnostic(code(modeshift::device_failed))]
    DeviceFailed {
        operation: String,
        device: String,
        detail: String,
    },

    #[error("{failed} of {total} device(s) did not complete {operation}")]
    #[diagnostic(
        code(modeshift::partial_failure),
        help("Rerun with -v for per-device errors; successful devices need no retry.")
    )]
    PartialFailure {
        operation: String,
        failed: usize,
        total: usize,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(modeshift::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(modeshift::profile_not_found),
        help("Available profiles: {available}\nConfig file: {path}")
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error("No controller address configured")]
    #[diagnostic(
        code(modeshift::no_controller),
        help(
            "Pass --controller <IP>, set MODESHIFT_CONTROLLER, or add a profile to\n\
             {path}"
        )
    )]
    NoController { path: String },

    #[error(transparent)]
    #[diagnostic(code(modeshift::config))]
    Config(ConfigError),

    // ── Local I/O ────────────────────────────────────────────────────
    #[error("Failed to write report {destination}: {reason}")]
    #[diagnostic(
        code(modeshift::report),
        help("Check that --output-dir exists and is writable.")
    )]
    Report { destination: String, reason: String },

    #[error("Input aborted: {reason}")]
    #[diagnostic(code(modeshift::prompt))]
    Prompt { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(modeshift::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::DeviceNotFound { .. } => exit_code::NOT_FOUND,
            Self::PartialFailure { .. } => exit_code::PARTIAL,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoController { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                if reason.contains("certificate") {
                    CliError::TlsError { url }
                } else {
                    CliError::ConnectionFailed { url, reason }
                }
            }
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Api { status, path } => CliError::Api { status, path },
            CoreError::MalformedResponse { message } => CliError::MalformedResponse { message },
            CoreError::DeviceNotFound { system_ip } => CliError::DeviceNotFound { system_ip },
            CoreError::InvalidAddress { input } => CliError::Validation {
                field: "controller".into(),
                reason: format!("'{input}' is not a valid IPv4 or IPv6 address"),
            },
            CoreError::Report {
                destination,
                reason,
            } => CliError::Report {
                destination,
                reason,
            },
            CoreError::Prompt { reason } => CliError::Prompt { reason },
            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_documented_exit_codes() {
        let auth: CliError = CoreError::AuthenticationFailed {
            message: "login rejected (HTTP 401)".into(),
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let tls: CliError = CoreError::ConnectionFailed {
            url: "https://10.10.20.90:8443/".into(),
            reason: "invalid peer certificate: UnknownIssuer".into(),
        }
        .into();
        assert!(matches!(tls, CliError::TlsError { .. }));
        assert_eq!(tls.exit_code(), exit_code::CONNECTION);

        let bad_ip: CliError = CoreError::InvalidAddress {
            input: "vmanage".into(),
        }
        .into();
        assert_eq!(bad_ip.exit_code(), exit_code::USAGE);

        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn partial_failure_has_its_own_code() {
        let err = CliError::PartialFailure {
            operation: "convert-to-cli".into(),
            failed: 1,
            total: 3,
        };
        assert_eq!(err.exit_code(), exit_code::PARTIAL);
        assert_eq!(err.to_string(), "1 of 3 device(s) did not complete convert-to-cli");
    }
}
