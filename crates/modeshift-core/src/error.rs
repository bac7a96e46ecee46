// ── Core error types ──
//
// User-facing errors from modeshift-core. The `From<modeshift_api::Error>`
// impl translates transport-layer errors into domain variants so consumers
// branch on meaning, not on HTTP details.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller request timed out")]
    Timeout,

    // ── API errors ───────────────────────────────────────────────────
    #[error("Controller returned HTTP {status} for {path}")]
    Api { status: u16, path: String },

    #[error("Unexpected controller response: {message}")]
    MalformedResponse { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("No managed device with system IP {system_ip}")]
    DeviceNotFound { system_ip: String },

    // ── Validation errors ────────────────────────────────────────────
    #[error("'{input}' is not a valid IPv4 or IPv6 address")]
    InvalidAddress { input: String },

    // ── Collaborator errors ──────────────────────────────────────────
    #[error("Failed to write report {destination}: {reason}")]
    Report { destination: String, reason: String },

    #[error("Input aborted: {reason}")]
    Prompt { reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Errors that end the whole run rather than a single menu operation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::Config { .. } | Self::Prompt { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<modeshift_api::Error> for CoreError {
    fn from(err: modeshift_api::Error) -> Self {
        match err {
            modeshift_api::Error::InvalidCredentials { message } => {
                CoreError::AuthenticationFailed { message }
            }
            modeshift_api::Error::LoginPageReturned => CoreError::AuthenticationFailed {
                message: "controller returned its login page".into(),
            },
            modeshift_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::ConnectionFailed {
                        url: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: error_chain(e),
                    }
                }
            }
            modeshift_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            modeshift_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            modeshift_api::Error::HttpFailure { status, path, .. } => {
                CoreError::Api { status, path }
            }
            modeshift_api::Error::MalformedResponse { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}

/// `outer: inner: root` so TLS and DNS causes survive the conversion.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn login_failures_map_to_authentication() {
        let err: CoreError = modeshift_api::Error::LoginPageReturned.into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn http_failure_keeps_status() {
        let err: CoreError = modeshift_api::Error::HttpFailure {
            status: 500,
            path: "/dataservice/system/device/vedges".into(),
            body: String::new(),
        }
        .into();
        assert!(matches!(err, CoreError::Api { status: 500, .. }));
        assert!(!err.is_fatal());
    }
}
