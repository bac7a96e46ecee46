#![allow(clippy::unwrap_used)]
// Integration tests for `ManagerClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use std::time::Duration;

use modeshift_api::{Credential, Error, ManagerClient, ModeChangeRequest, TlsMode, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ManagerClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ManagerClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

fn credential() -> Credential {
    Credential::new("127.0.0.1", 8443, secret("JSESSIONID=sess1"), secret("tok1")).unwrap()
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_security_check_returns_session_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .and(body_string_contains("j_username=admin"))
        .and(body_string_contains("j_password=s3cret"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=sess1; Path=/; HttpOnly"),
        )
        .mount(&server)
        .await;

    let cookie = client.security_check("admin", &secret("s3cret")).await.unwrap();
    assert_eq!(cookie.expose_secret(), "JSESSIONID=sess1");
}

#[tokio::test]
async fn test_security_check_rejects_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.security_check("admin", &secret("wrong")).await;
    assert!(
        matches!(result, Err(Error::InvalidCredentials { .. })),
        "expected InvalidCredentials, got: {result:?}"
    );
}

#[tokio::test]
async fn test_security_check_rejects_login_page() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=anon; Path=/")
                .set_body_string("<html><body><form>login</form></body></html>"),
        )
        .mount(&server)
        .await;

    let result = client.security_check("admin", &secret("wrong")).await;
    assert!(
        matches!(result, Err(Error::LoginPageReturned)),
        "expected LoginPageReturned, got: {result:?}"
    );
}

#[tokio::test]
async fn test_security_check_without_cookie_fails() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = client.security_check("admin", &secret("pw")).await;
    assert!(result.unwrap_err().is_auth_failure());
}

#[tokio::test]
async fn test_stalled_controller_times_out() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        tls: TlsMode::System,
        timeout: Duration::from_secs(1),
    };
    let client = ManagerClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=sess1; Path=/")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client.security_check("admin", &secret("s3cret")).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "unexpected: {err:?}");
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_client_token_is_raw_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dataservice/client/token"))
        .and(header("cookie", "JSESSIONID=sess1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ABCDEF0123456789\n"))
        .mount(&server)
        .await;

    let token = client.client_token(&secret("JSESSIONID=sess1")).await.unwrap();
    assert_eq!(token.expose_secret(), "ABCDEF0123456789");
}

#[tokio::test]
async fn test_client_token_rejects_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dataservice/client/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  "))
        .mount(&server)
        .await;

    let result = client.client_token(&secret("JSESSIONID=sess1")).await;
    assert!(matches!(result, Err(Error::InvalidCredentials { .. })));
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_sends_credential_headers() {
    let (server, client) = setup().await;

    let envelope = json!({
        "data": [
            {
                "host-name": "r1",
                "system-ip": "10.0.0.1",
                "configOperationMode": "vmanage",
                "vmanageConnectionState": "connected",
                "chasisNumber": "c1"
            },
            { "chasisNumber": "placeholder-without-system-ip" },
            "not-an-object"
        ]
    });

    Mock::given(method("GET"))
        .and(path("/dataservice/system/device/vedges"))
        .and(header("cookie", "JSESSIONID=sess1"))
        .and(header("x-xsrf-token", "tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_devices(&credential()).await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].host_name.as_deref(), Some("r1"));
    assert_eq!(devices[0].system_ip.as_deref(), Some("10.0.0.1"));
    assert_eq!(devices[0].chassis_number.as_deref(), Some("c1"));
    assert!(devices[0].template.is_none());
    assert!(devices[1].system_ip.is_none());
}

#[tokio::test]
async fn test_list_devices_keeps_entries_with_odd_field_types() {
    let (server, client) = setup().await;

    let envelope = json!({
        "data": [
            {
                "host-name": "r1",
                "system-ip": "10.0.0.1",
                "configOperationMode": "vmanage",
                "chasisNumber": "c1"
            },
            {
                "host-name": "r2",
                "system-ip": "10.0.0.2",
                "configOperationMode": "vmanage",
                "chasisNumber": "c2",
                "template": { "name": "branch" }
            },
            {
                "host-name": 12345,
                "system-ip": "10.0.0.3",
                "configOperationMode": "vmanage",
                "chasisNumber": "c3"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/dataservice/system/device/vedges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let devices = client.list_devices(&credential()).await.unwrap();

    let ips: Vec<_> = devices.iter().map(|d| d.system_ip.as_deref()).collect();
    assert_eq!(ips, vec![Some("10.0.0.1"), Some("10.0.0.2"), Some("10.0.0.3")]);
    assert!(devices[1].template.is_none());
    assert_eq!(devices[2].host_name.as_deref(), Some("12345"));
}

#[tokio::test]
async fn test_list_devices_http_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dataservice/system/device/vedges"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = client.list_devices(&credential()).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_list_devices_without_envelope_is_malformed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dataservice/system/device/vedges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"header": {}})))
        .mount(&server)
        .await;

    let result = client.list_devices(&credential()).await;
    assert!(matches!(result, Err(Error::MalformedResponse { .. })));
}

// ── Template tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_running_config() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dataservice/template/config/running/c1"))
        .and(header("x-xsrf-token", "tok1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"config": "system\n host-name r1\n!"})),
        )
        .mount(&server)
        .await;

    let config = client.running_config(&credential(), "c1").await.unwrap();
    assert_eq!(config, "system\n host-name r1\n!");
}

#[tokio::test]
async fn test_request_cli_mode_body_and_ack() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/dataservice/template/config/device/mode/cli"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "deviceType": "vedge",
            "devices": [{"deviceId": "c1", "deviceIP": "10.0.0.1"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "cli_mode-123"})))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client
        .request_cli_mode(&credential(), &ModeChangeRequest::single("c1", "10.0.0.1"))
        .await
        .unwrap();

    assert_eq!(ack.status, 200);
    assert_eq!(ack.task_id.as_deref(), Some("cli_mode-123"));
}

#[tokio::test]
async fn test_request_cli_mode_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/dataservice/template/config/device/mode/cli"))
        .respond_with(ResponseTemplate::new(400).set_body_string("device is offline"))
        .mount(&server)
        .await;

    let err = client
        .request_cli_mode(&credential(), &ModeChangeRequest::single("c1", "10.0.0.1"))
        .await
        .unwrap_err();

    match err {
        Error::HttpFailure { status, body, .. } => {
            assert_eq!(status, 400);
            assert_eq!(body, "device is offline");
        }
        other => panic!("expected HttpFailure, got {other:?}"),
    }
}
