use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Placeholder written for devices with no attached device template.
pub const NO_TEMPLATE: &str = "no-template-attached";

/// Who owns a device's configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum ConfigMode {
    /// Pushed by controller device templates (`"vmanage"` on the wire).
    #[serde(rename = "vmanage")]
    #[strum(serialize = "vmanage")]
    TemplateManaged,
    /// Managed directly on the device CLI (`"cli"`).
    #[serde(rename = "cli")]
    #[strum(serialize = "cli")]
    CliManaged,
    #[serde(rename = "unknown")]
    #[strum(serialize = "unknown")]
    Unknown,
}

impl ConfigMode {
    /// Map the controller's `configOperationMode` value.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("vmanage") => Self::TemplateManaged,
            Some("cli") => Self::CliManaged,
            _ => Self::Unknown,
        }
    }
}

/// Snapshot of one managed device, keyed by `system_ip`.
///
/// Serialized field names follow the controller's, so a CSV of these
/// records reads the same as the controller's own export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "host-name")]
    pub host_name: String,
    #[serde(rename = "system-ip")]
    pub system_ip: String,
    #[serde(rename = "configOperationMode")]
    pub config_mode: ConfigMode,
    #[serde(rename = "template")]
    pub attached_template: String,
    #[serde(rename = "vmanageConnectionState")]
    pub connection_state: String,
    #[serde(rename = "chasisNumber")]
    pub chassis_id: String,
}

impl DeviceRecord {
    /// `host-name (system-ip)` for log lines and progress messages.
    pub fn label(&self) -> String {
        if self.host_name.is_empty() {
            self.system_ip.clone()
        } else {
            format!("{} ({})", self.host_name, self.system_ip)
        }
    }
}
