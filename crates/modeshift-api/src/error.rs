use thiserror::Error;

/// Top-level error type for the `modeshift-api` crate.
///
/// Covers every failure mode of the controller's session API:
/// the two-step login handshake, transport, HTTP status and body decoding.
/// `modeshift-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// `/j_security_check` answered with a non-success status, or the
    /// handshake produced no usable session cookie / token.
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    /// The controller served its HTML login page instead of a session.
    /// Some releases do this with a 200 status on a bad password.
    #[error("Login failed: controller returned its login page")]
    LoginPageReturned,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Authenticated request answered with a non-2xx status.
    #[error("HTTP {status} from {path}")]
    HttpFailure {
        status: u16,
        path: String,
        body: String,
    },

    /// The body did not have the expected shape, with the raw body for debugging.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error came out of the login handshake.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. } | Self::LoginPageReturned
        )
    }

    /// Returns `true` if the request never got an answer in time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status of the failed request, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpFailure { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
