// ── Controller seam ──
//
// The handful of controller calls the workflow needs. `ManagerClient`
// implements it for real controllers; tests substitute in-memory fakes.

use std::future::Future;

use secrecy::SecretString;

use modeshift_api::{Credential, ManagerClient, ModeChangeAck, ModeChangeRequest, RawDevice};

/// Controller endpoints consumed by the core.
pub trait ControllerApi {
    /// Controller address and port, as recorded in the resulting credential.
    fn endpoint(&self) -> (String, u16);

    /// Step one of the handshake: form login, yields the session cookie.
    fn security_check(
        &self,
        username: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<SecretString, modeshift_api::Error>>;

    /// Step two: exchange the session cookie for the XSRF token.
    fn client_token(
        &self,
        session_cookie: &SecretString,
    ) -> impl Future<Output = Result<SecretString, modeshift_api::Error>>;

    fn list_devices(
        &self,
        credential: &Credential,
    ) -> impl Future<Output = Result<Vec<RawDevice>, modeshift_api::Error>>;

    fn running_config(
        &self,
        credential: &Credential,
        chassis_id: &str,
    ) -> impl Future<Output = Result<String, modeshift_api::Error>>;

    fn request_cli_mode(
        &self,
        credential: &Credential,
        request: &ModeChangeRequest,
    ) -> impl Future<Output = Result<ModeChangeAck, modeshift_api::Error>>;
}

impl ControllerApi for ManagerClient {
    fn endpoint(&self) -> (String, u16) {
        let url = self.base_url();
        (
            url.host_str().unwrap_or_default().to_owned(),
            url.port_or_known_default().unwrap_or_default(),
        )
    }

    async fn security_check(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, modeshift_api::Error> {
        ManagerClient::security_check(self, username, password).await
    }

    async fn client_token(
        &self,
        session_cookie: &SecretString,
    ) -> Result<SecretString, modeshift_api::Error> {
        ManagerClient::client_token(self, session_cookie).await
    }

    async fn list_devices(
        &self,
        credential: &Credential,
    ) -> Result<Vec<RawDevice>, modeshift_api::Error> {
        ManagerClient::list_devices(self, credential).await
    }

    async fn running_config(
        &self,
        credential: &Credential,
        chassis_id: &str,
    ) -> Result<String, modeshift_api::Error> {
        ManagerClient::running_config(self, credential, chassis_id).await
    }

    async fn request_cli_mode(
        &self,
        credential: &Credential,
        request: &ModeChangeRequest,
    ) -> Result<ModeChangeAck, modeshift_api::Error> {
        ManagerClient::request_cli_mode(self, credential, request).await
    }
}
