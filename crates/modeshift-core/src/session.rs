// ── Authenticated session ──
//
// Runs the two-step login handshake once and produces the `Credential`
// every later call borrows. One attempt only: a failure ends the run.

use secrecy::SecretString;
use tracing::info;

use modeshift_api::Credential;

use crate::api::ControllerApi;
use crate::error::CoreError;

/// Username and password collected by the CLI.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: SecretString,
}

/// Stateless entry point for the login handshake.
pub struct AuthSession;

impl AuthSession {
    /// Log in and fetch the XSRF token.
    ///
    /// Never returns a partially populated credential: any failed step,
    /// an empty cookie or an empty token is an `AuthenticationFailed`.
    pub async fn authenticate<A: ControllerApi>(
        api: &A,
        login: &LoginRequest,
    ) -> Result<Credential, CoreError> {
        let (address, port) = api.endpoint();

        let session_cookie = api.security_check(&login.username, &login.password).await?;
        let csrf_token = api.client_token(&session_cookie).await?;
        let credential = Credential::new(address, port, session_cookie, csrf_token)?;

        info!(
            controller = credential.address(),
            port = credential.port(),
            user = %login.username,
            "authenticated"
        );
        Ok(credential)
    }
}
