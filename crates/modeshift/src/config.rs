//! Flag + profile resolution into core types.
//!
//! Precedence for every setting: CLI flag (or its env var), then the active
//! profile, then `[defaults]`. Credentials that are still missing after that
//! are prompted for.

use dialoguer::Input;
use secrecy::SecretString;

use modeshift_config::{Config, Profile, config_path, profile_to_controller_config, resolve_password};
use modeshift_core::{ControllerConfig, LoginRequest};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Merge flags over the named profile and build a `ControllerConfig`.
///
/// An explicitly requested profile must exist; the implicit default may be
/// absent when `--controller` is given.
pub fn controller_config(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<ControllerConfig, CliError> {
    let mut profile = match config.profiles.get(profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name.into(),
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
                path: config_path().display().to_string(),
            });
        }
        None => Profile::default(),
    };

    apply_overrides(&mut profile, global);
    if profile.controller.trim().is_empty() {
        return Err(CliError::NoController {
            path: config_path().display().to_string(),
        });
    }

    let mut controller = profile_to_controller_config(&profile, &config.defaults)?;
    if let Some(pacing) = global.pacing {
        controller.pacing = pacing;
    }
    Ok(controller)
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref controller) = global.controller {
        profile.controller.clone_from(controller);
    }
    if global.port.is_some() {
        profile.port = global.port;
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.ca_cert.is_some() {
        profile.ca_cert.clone_from(&global.ca_cert);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    if global.output_dir.is_some() {
        profile.output_dir.clone_from(&global.output_dir);
    }
}

/// Collect the username and password, prompting for whatever is missing.
pub fn login_request(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<LoginRequest, CliError> {
    let profile = config.profiles.get(profile_name);

    let username = match global
        .username
        .clone()
        .or_else(|| profile.and_then(|p| p.username.clone()))
    {
        Some(username) => username,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?,
    };
    if username.trim().is_empty() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: "cannot be empty".into(),
        });
    }

    let password = match resolve_password(profile, profile_name) {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")
            .map(SecretString::from)
            .map_err(prompt_err)?,
    };

    Ok(LoginRequest { username, password })
}

pub(crate) fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt {
        reason: e.to_string(),
    }
}
