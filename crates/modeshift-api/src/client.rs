// vManage HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, credential headers and
// status checking. Endpoint groups (devices, templates) and the login
// handshake are implemented as inherent methods in separate files to keep
// this module focused on transport mechanics.

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credential;
use crate::error::Error;
use crate::transport::TransportConfig;

const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Raw HTTP client for one vManage controller.
///
/// Holds no session state: every authenticated call borrows a
/// [`Credential`] and sends it as `Cookie` + `X-XSRF-TOKEN` headers.
#[derive(Debug, Clone)]
pub struct ManagerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ManagerClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the controller root, e.g. `https://10.10.20.90:8443`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Build the `https://{address}:{port}` root URL for a controller.
    pub fn controller_url(address: &str, port: u16) -> Result<Url, Error> {
        let host = if address.contains(':') && !address.starts_with('[') {
            format!("[{address}]")
        } else {
            address.to_owned()
        };
        Ok(Url::parse(&format!("https://{host}:{port}"))?)
    }

    /// The underlying HTTP client (for the login handshake).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join an absolute API path onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn auth_headers(credential: &Credential) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let mut cookie = HeaderValue::from_str(credential.session_cookie().expose_secret())
            .map_err(|_| Error::InvalidCredentials {
                message: "session cookie is not a valid header value".into(),
            })?;
        cookie.set_sensitive(true);
        headers.insert(COOKIE, cookie);

        let mut token = HeaderValue::from_str(credential.csrf_token().expose_secret())
            .map_err(|_| Error::InvalidCredentials {
                message: "XSRF token is not a valid header value".into(),
            })?;
        token.set_sensitive(true);
        headers.insert(XSRF_HEADER, token);

        Ok(headers)
    }

    /// Authenticated GET, returning the body of a 2xx response.
    pub(crate) async fn get_text(&self, credential: &Credential, path: &str) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .headers(Self::auth_headers(credential)?)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp, path).await
    }

    /// Authenticated GET, decoding the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
    ) -> Result<T, Error> {
        let body = self.get_text(credential, path).await?;
        decode(&body)
    }

    /// Authenticated POST with a JSON body, returning the status and body of a 2xx response.
    pub(crate) async fn post_json(
        &self,
        credential: &Credential,
        path: &str,
        body: &impl Serialize,
    ) -> Result<(u16, String), Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let payload = serde_json::to_vec(body).map_err(|e| Error::MalformedResponse {
            message: format!("failed to encode request body: {e}"),
            body: String::new(),
        })?;

        let resp = self
            .http
            .post(url)
            .headers(Self::auth_headers(credential)?)
            .body(payload)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status().as_u16();
        let text = Self::check_status(resp, path).await?;
        Ok((status, text))
    }

    /// Turn a non-2xx response into `Error::HttpFailure`, else return its body.
    async fn check_status(resp: reqwest::Response, path: &str) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(Error::HttpFailure {
                status: status.as_u16(),
                path: path.to_owned(),
                body,
            })
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::MalformedResponse {
        message: e.to_string(),
        body: body.to_owned(),
    })
}
