//! Configuration for the modeshift CLI.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and
//! translation to `modeshift_core::ControllerConfig`. The CLI layers its
//! `GlobalOpts` flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use modeshift_core::{ControllerConfig, CoreError, TlsVerification, parse_controller_address};

const KEYRING_SERVICE: &str = "modeshift";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<CoreError> for ConfigError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAddress { input } => Self::Validation {
                field: "controller".into(),
                reason: format!("'{input}' is not a valid IPv4 or IPv6 address"),
            },
            other => Self::Validation {
                field: "controller".into(),
                reason: other.to_string(),
            },
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between devices in bulk runs.
    #[serde(default = "default_pacing")]
    pub pacing_secs: u64,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            port: default_port(),
            insecure: false,
            timeout: default_timeout(),
            pacing_secs: default_pacing(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_port() -> u16 {
    8443
}
fn default_timeout() -> u64 {
    30
}
fn default_pacing() -> u64 {
    5
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// A named controller profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller management IP (e.g., "10.10.20.90").
    pub controller: String,

    /// Override HTTPS port.
    pub port: Option<u16>,

    /// Username for the session login.
    pub username: Option<String>,

    /// Password in plaintext. Prefer the keyring or `MODESHIFT_PASSWORD`.
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override pacing.
    pub pacing_secs: Option<u64>,

    /// Override report directory.
    pub output_dir: Option<PathBuf>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "modeshift", "modeshift").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("modeshift");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MODESHIFT_CONFIG_").split("__"))
}

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

/// Load config, returning a default if the file cannot be parsed.
///
/// A missing file is not an error; a malformed one is logged and ignored.
pub fn load_config_or_default() -> Config {
    load_config_or_default_from(&config_path())
}

fn load_config_or_default_from(path: &Path) -> Config {
    match load_config_from(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "ignoring unreadable config file, using defaults"
            );
            Config::default()
        }
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the login password, or `None` if the caller should prompt.
///
/// Order: `MODESHIFT_PASSWORD` env var, system keyring
/// (`modeshift` / `<profile>/password`), plaintext in the profile.
pub fn resolve_password(profile: Option<&Profile>, profile_name: &str) -> Option<SecretString> {
    if let Ok(pw) = std::env::var("MODESHIFT_PASSWORD") {
        return Some(SecretString::from(pw));
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Some(SecretString::from(pw));
        }
    }

    profile
        .and_then(|p| p.password.clone())
        .map(SecretString::from)
}

/// Build a `ControllerConfig` from a profile plus global defaults, without CLI overrides.
pub fn profile_to_controller_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    let address = parse_controller_address(&profile.controller)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ControllerConfig::new(address);
    config.port = profile.port.unwrap_or(defaults.port);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.pacing = Duration::from_secs(profile.pacing_secs.unwrap_or(defaults.pacing_secs));
    config.output_dir = profile
        .output_dir
        .clone()
        .unwrap_or_else(|| defaults.output_dir.clone());
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn profile_overrides_defaults() {
        let profile = Profile {
            controller: "10.10.20.90".into(),
            port: Some(443),
            pacing_secs: Some(2),
            ..Profile::default()
        };
        let cfg = profile_to_controller_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(cfg.port, 443);
        assert_eq!(cfg.pacing, Duration::from_secs(2));
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn insecure_must_be_opted_into() {
        let mut profile = Profile {
            controller: "10.10.20.90".into(),
            ca_cert: Some("/etc/ssl/lab-ca.pem".into()),
            ..Profile::default()
        };
        let cfg = profile_to_controller_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(cfg.tls, TlsVerification::CustomCa("/etc/ssl/lab-ca.pem".into()));

        profile.insecure = Some(true);
        let cfg = profile_to_controller_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn hostname_controller_is_rejected() {
        let profile = Profile {
            controller: "vmanage.example.net".into(),
            ..Profile::default()
        };
        let err = profile_to_controller_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "controller"));
    }

    #[test]
    fn toml_file_and_env_layer_over_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    default_profile = "lab"

                    [defaults]
                    pacing_secs = 10

                    [profiles.lab]
                    controller = "10.10.20.90"
                    username = "admin"
                "#,
            )?;
            jail.set_env("MODESHIFT_CONFIG_DEFAULTS__TIMEOUT", "60");

            let cfg: Config = figment_for(Path::new("config.toml")).extract()?;
            assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
            assert_eq!(cfg.defaults.pacing_secs, 10);
            assert_eq!(cfg.defaults.timeout, 60);
            assert_eq!(cfg.defaults.port, 8443);
            assert_eq!(cfg.profiles["lab"].username.as_deref(), Some("admin"));
            Ok(())
        });
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    [profiles.lab
                    controller = "10.10.20.90"
                "#,
            )?;

            assert!(load_config_from(Path::new("config.toml")).is_err());

            let cfg = load_config_or_default_from(Path::new("config.toml"));
            assert_eq!(cfg.default_profile.as_deref(), Some("default"));
            assert!(cfg.profiles.is_empty());
            assert_eq!(cfg.defaults.port, 8443);
            Ok(())
        });
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("absent.toml")).unwrap();
            assert_eq!(cfg.default_profile.as_deref(), Some("default"));
            Ok(())
        });
    }
}
