// vManage response and request types
//
// The dataservice endpoints wrap list payloads in `{ "data": [...] }`.
// Device fields use `#[serde(default)]` throughout because the controller
// omits keys freely (unattached devices have no `template`, placeholder
// entries have no `system-ip`). They also go through `lenient_string`, so a
// field of an unexpected JSON type becomes `None` instead of failing the entry.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Response envelope ────────────────────────────────────────────────

/// `{ "data": [...] }` wrapper returned by list endpoints.
///
/// Elements stay untyped so one odd entry cannot fail the whole list.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope {
    pub data: Vec<serde_json::Value>,
}

// ── Device ───────────────────────────────────────────────────────────

/// One element of `GET /dataservice/system/device/vedges`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDevice {
    #[serde(default, rename = "host-name", deserialize_with = "lenient_string")]
    pub host_name: Option<String>,
    #[serde(default, rename = "system-ip", deserialize_with = "lenient_string")]
    pub system_ip: Option<String>,
    /// Spelled `chasisNumber` by the controller.
    #[serde(default, rename = "chasisNumber", deserialize_with = "lenient_string")]
    pub chassis_number: Option<String>,
    /// `"vmanage"` (template-managed) or `"cli"`.
    #[serde(default, rename = "configOperationMode", deserialize_with = "lenient_string")]
    pub config_operation_mode: Option<String>,
    #[serde(default, rename = "vmanageConnectionState", deserialize_with = "lenient_string")]
    pub connection_state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub template: Option<String>,
}

/// Strings pass through, numbers and booleans are stringified, anything
/// else (null, arrays, objects) is treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Body of `GET /dataservice/template/config/running/{chassisId}`.
#[derive(Debug, Deserialize)]
pub struct RunningConfig {
    pub config: String,
}

// ── Mode change ──────────────────────────────────────────────────────

/// Body of `POST /dataservice/template/config/device/mode/cli`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeChangeRequest {
    #[serde(rename = "deviceType")]
    pub device_type: String,
    pub devices: Vec<ModeChangeDevice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeChangeDevice {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "deviceIP")]
    pub device_ip: String,
}

impl ModeChangeRequest {
    /// A request addressing exactly one vEdge by chassis id and system IP.
    pub fn single(chassis_id: &str, system_ip: &str) -> Self {
        Self {
            device_type: "vedge".into(),
            devices: vec![ModeChangeDevice {
                device_id: chassis_id.to_owned(),
                device_ip: system_ip.to_owned(),
            }],
        }
    }
}

/// The controller's acknowledgement of a mode-change request.
///
/// Acceptance only: the controller runs the conversion as a background
/// task, identified by `task_id` when it reports one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChangeAck {
    pub status: u16,
    pub task_id: Option<String>,
}
