// Session authentication
//
// Two-step handshake: form login at `/j_security_check` yields the session
// cookie, then `/dataservice/client/token` yields the anti-forgery token.
// Both end up in an immutable `Credential` that every later call borrows.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ManagerClient;
use crate::cookie;
use crate::error::Error;

const SECURITY_CHECK_PATH: &str = "/j_security_check";
const TOKEN_PATH: &str = "/dataservice/client/token";

/// Session cookie + XSRF token for one controller.
///
/// Built only through [`Credential::new`], which refuses empty tokens, so a
/// half-populated credential never exists.
#[derive(Clone)]
pub struct Credential {
    address: String,
    port: u16,
    session_cookie: SecretString,
    csrf_token: SecretString,
}

impl Credential {
    pub fn new(
        address: impl Into<String>,
        port: u16,
        session_cookie: SecretString,
        csrf_token: SecretString,
    ) -> Result<Self, Error> {
        if session_cookie.expose_secret().is_empty() {
            return Err(Error::InvalidCredentials {
                message: "empty session cookie".into(),
            });
        }
        if csrf_token.expose_secret().is_empty() {
            return Err(Error::InvalidCredentials {
                message: "empty XSRF token".into(),
            });
        }
        Ok(Self {
            address: address.into(),
            port,
            session_cookie,
            csrf_token,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `Cookie` header value, e.g. `JSESSIONID=...`.
    pub fn session_cookie(&self) -> &SecretString {
        &self.session_cookie
    }

    /// `X-XSRF-TOKEN` header value.
    pub fn csrf_token(&self) -> &SecretString {
        &self.csrf_token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("session_cookie", &"[REDACTED]")
            .field("csrf_token", &"[REDACTED]")
            .finish()
    }
}

impl ManagerClient {
    /// Submit the login form and return the session cookie.
    ///
    /// A status of 300 or above is a credential failure. A body carrying an
    /// HTML page is the login form served back, which also means failure.
    pub async fn security_check(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, Error> {
        let url = self.url(SECURITY_CHECK_PATH)?;
        debug!("logging in at {}", url);

        let resp = self
            .http()
            .post(url.clone())
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .form(&[
                ("j_username", username),
                ("j_password", password.expose_secret()),
            ])
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status.as_u16() >= 300 {
            return Err(Error::InvalidCredentials {
                message: format!("login rejected (HTTP {status})"),
            });
        }

        let host = url.host_str().unwrap_or_default().to_owned();
        let pairs: Vec<(String, String)> = resp
            .cookies()
            .map(|c| (c.name().to_owned(), c.value().to_owned()))
            .collect();
        let jar = cookie::render_jar(
            pairs
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str(), host.as_str())),
        );

        let body = resp.text().await.map_err(Error::Transport)?;
        if is_html_page(&body) {
            return Err(Error::LoginPageReturned);
        }

        let session = cookie::parse_session_cookie(&jar).ok_or_else(|| {
            Error::InvalidCredentials {
                message: "login response carried no session cookie".into(),
            }
        })?;

        debug!("login successful");
        Ok(SecretString::from(session))
    }

    /// Exchange the session cookie for the anti-forgery token.
    ///
    /// The response body is the token itself, with no JSON envelope.
    pub async fn client_token(&self, session_cookie: &SecretString) -> Result<SecretString, Error> {
        let url = self.url(TOKEN_PATH)?;
        debug!("fetching XSRF token from {}", url);

        let resp = self
            .http()
            .get(url)
            .header(reqwest::header::COOKIE, session_cookie.expose_secret())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::InvalidCredentials {
                message: format!("token request rejected (HTTP {status})"),
            });
        }
        if is_html_page(&body) {
            return Err(Error::LoginPageReturned);
        }

        let token = body.trim();
        if token.is_empty() {
            return Err(Error::InvalidCredentials {
                message: "controller returned an empty XSRF token".into(),
            });
        }
        Ok(SecretString::from(token.to_owned()))
    }
}

fn is_html_page(body: &str) -> bool {
    body.to_ascii_lowercase().contains("<html")
}
