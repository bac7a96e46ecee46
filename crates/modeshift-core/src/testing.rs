// In-memory collaborators shared by the unit tests.
#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use modeshift_api::{Credential, ModeChangeAck, ModeChangeRequest, RawDevice};

use crate::api::ControllerApi;
use crate::error::CoreError;
use crate::model::{ConfigMode, DeviceRecord, NO_TEMPLATE};
use crate::report::ReportSink;

pub fn credential() -> Credential {
    Credential::new(
        "10.10.20.90",
        8443,
        SecretString::from("JSESSIONID=abc".to_owned()),
        SecretString::from("tok".to_owned()),
    )
    .unwrap()
}

/// A managed device whose chassis number is `chassis-<system_ip>`.
pub fn record(host: &str, system_ip: &str, mode: ConfigMode) -> DeviceRecord {
    DeviceRecord {
        host_name: host.into(),
        system_ip: system_ip.into(),
        config_mode: mode,
        attached_template: NO_TEMPLATE.into(),
        connection_state: "connected".into(),
        chassis_id: format!("chassis-{system_ip}"),
    }
}

pub fn raw_device(host: &str, system_ip: &str, chassis: &str, mode: &str) -> RawDevice {
    RawDevice {
        host_name: Some(host.into()),
        system_ip: Some(system_ip.into()),
        chassis_number: Some(chassis.into()),
        config_operation_mode: Some(mode.into()),
        connection_state: Some("connected".into()),
        template: None,
    }
}

/// Scriptable controller. Chassis numbers in `failing` make both the
/// running-config and mode-change calls fail with HTTP 500.
pub struct FakeApi {
    pub login_page: bool,
    pub reject_login: bool,
    pub token: String,
    pub devices: Vec<RawDevice>,
    pub inventory_status: Option<u16>,
    pub failing: HashSet<String>,
    pub calls: RefCell<Vec<String>>,
    pub mode_requests: RefCell<Vec<ModeChangeRequest>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            login_page: false,
            reject_login: false,
            token: "tok".into(),
            devices: Vec::new(),
            inventory_status: None,
            failing: HashSet::new(),
            calls: RefCell::new(Vec::new()),
            mode_requests: RefCell::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub fn failing_for<'a>(chassis: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            failing: chassis.into_iter().map(str::to_owned).collect(),
            ..Self::default()
        }
    }

    /// Endpoint calls made after login, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn mode_requests(&self) -> Vec<ModeChangeRequest> {
        self.mode_requests.borrow().clone()
    }

    fn server_error(path: &str) -> modeshift_api::Error {
        modeshift_api::Error::HttpFailure {
            status: 500,
            path: path.into(),
            body: String::new(),
        }
    }
}

impl ControllerApi for FakeApi {
    fn endpoint(&self) -> (String, u16) {
        ("10.10.20.90".into(), 8443)
    }

    async fn security_check(
        &self,
        _username: &str,
        _password: &SecretString,
    ) -> Result<SecretString, modeshift_api::Error> {
        if self.reject_login {
            return Err(modeshift_api::Error::InvalidCredentials {
                message: "login rejected (HTTP 401)".into(),
            });
        }
        if self.login_page {
            return Err(modeshift_api::Error::LoginPageReturned);
        }
        Ok(SecretString::from("JSESSIONID=abc".to_owned()))
    }

    async fn client_token(
        &self,
        session_cookie: &SecretString,
    ) -> Result<SecretString, modeshift_api::Error> {
        assert_eq!(session_cookie.expose_secret(), "JSESSIONID=abc");
        Ok(SecretString::from(self.token.clone()))
    }

    async fn list_devices(
        &self,
        _credential: &Credential,
    ) -> Result<Vec<RawDevice>, modeshift_api::Error> {
        self.calls.borrow_mut().push("list_devices".into());
        match self.inventory_status {
            Some(status) => Err(modeshift_api::Error::HttpFailure {
                status,
                path: "/dataservice/system/device/vedges".into(),
                body: String::new(),
            }),
            None => Ok(self.devices.clone()),
        }
    }

    async fn running_config(
        &self,
        _credential: &Credential,
        chassis_id: &str,
    ) -> Result<String, modeshift_api::Error> {
        self.calls.borrow_mut().push(format!("running_config {chassis_id}"));
        if self.failing.contains(chassis_id) {
            return Err(Self::server_error("/dataservice/template/config/running"));
        }
        Ok(format!("config of {chassis_id}"))
    }

    async fn request_cli_mode(
        &self,
        _credential: &Credential,
        request: &ModeChangeRequest,
    ) -> Result<ModeChangeAck, modeshift_api::Error> {
        self.calls.borrow_mut().push("request_cli_mode".into());
        self.mode_requests.borrow_mut().push(request.clone());
        let failing = request
            .devices
            .iter()
            .any(|d| self.failing.contains(&d.device_id));
        if failing {
            return Err(Self::server_error("/dataservice/template/config/device/mode/cli"));
        }
        Ok(ModeChangeAck {
            status: 200,
            task_id: Some("task-1".into()),
        })
    }
}

/// Sink that keeps everything in memory.
#[derive(Default)]
pub struct MemorySink {
    pub tables: Vec<(PathBuf, Vec<String>, Vec<DeviceRecord>)>,
    pub texts: Vec<(PathBuf, String)>,
    pub fail: bool,
}

impl ReportSink for MemorySink {
    fn write_records(
        &mut self,
        records: &[DeviceRecord],
        field_names: &[&str],
        destination: &Path,
    ) -> Result<PathBuf, CoreError> {
        if self.fail {
            return Err(CoreError::Report {
                destination: destination.display().to_string(),
                reason: "disk full".into(),
            });
        }
        self.tables.push((
            destination.to_path_buf(),
            field_names.iter().map(ToString::to_string).collect(),
            records.to_vec(),
        ));
        Ok(destination.to_path_buf())
    }

    fn append_text(&mut self, text: &str, destination: &Path) -> Result<PathBuf, CoreError> {
        if self.fail {
            return Err(CoreError::Report {
                destination: destination.display().to_string(),
                reason: "disk full".into(),
            });
        }
        self.texts.push((destination.to_path_buf(), text.to_owned()));
        Ok(destination.to_path_buf())
    }
}
