// ── Device inventory ──
//
// Fetches the controller's device list as a fresh snapshot and derives
// mode-classified subsets from it. Nothing is cached: callers re-fetch
// whenever they need current classification.

use tracing::debug;

use modeshift_api::Credential;

use crate::api::ControllerApi;
use crate::convert::device_record;
use crate::error::CoreError;
use crate::model::{ConfigMode, DeviceRecord};

/// Fetch and normalize every managed device.
///
/// Placeholder entries without a system IP are skipped silently.
pub async fn fetch_devices<A: ControllerApi>(
    api: &A,
    credential: &Credential,
) -> Result<Vec<DeviceRecord>, CoreError> {
    let raw = api.list_devices(credential).await?;
    let total = raw.len();
    let devices: Vec<DeviceRecord> = raw.into_iter().filter_map(device_record).collect();
    debug!(total, managed = devices.len(), "fetched inventory");
    Ok(devices)
}

/// Order-preserving filter by configuration mode.
pub fn classify(devices: &[DeviceRecord], mode: ConfigMode) -> Vec<DeviceRecord> {
    devices
        .iter()
        .filter(|d| d.config_mode == mode)
        .cloned()
        .collect()
}

/// Look up a device by its system IP.
pub fn find_by_system_ip<'a>(
    devices: &'a [DeviceRecord],
    system_ip: &str,
) -> Option<&'a DeviceRecord> {
    let wanted = system_ip.trim();
    devices.iter().find(|d| d.system_ip == wanted)
}

/// Like [`find_by_system_ip`], but a miss is `DeviceNotFound`.
pub fn require_by_system_ip<'a>(
    devices: &'a [DeviceRecord],
    system_ip: &str,
) -> Result<&'a DeviceRecord, CoreError> {
    find_by_system_ip(devices, system_ip).ok_or_else(|| CoreError::DeviceNotFound {
        system_ip: system_ip.trim().to_owned(),
    })
}

/// Fetch a device's running configuration text.
pub async fn fetch_running_config<A: ControllerApi>(
    api: &A,
    credential: &Credential,
    device: &DeviceRecord,
) -> Result<String, CoreError> {
    if device.chassis_id.is_empty() {
        return Err(CoreError::MalformedResponse {
            message: format!("device {} has no chassis number", device.system_ip),
        });
    }
    Ok(api.running_config(credential, &device.chassis_id).await?)
}
