// Device inventory endpoint
//
// `GET /dataservice/system/device/vedges` lists every WAN edge the
// controller knows about, including unprovisioned placeholders.

use tracing::debug;

use crate::auth::Credential;
use crate::client::ManagerClient;
use crate::error::Error;
use crate::models::{DataEnvelope, RawDevice};

const VEDGES_PATH: &str = "/dataservice/system/device/vedges";

impl ManagerClient {
    /// List WAN edge devices.
    ///
    /// Elements that are not JSON objects are dropped here; filtering on
    /// `system-ip` is left to the caller.
    pub async fn list_devices(&self, credential: &Credential) -> Result<Vec<RawDevice>, Error> {
        let envelope: DataEnvelope = self.get_json(credential, VEDGES_PATH).await?;
        let total = envelope.data.len();

        let devices: Vec<RawDevice> = envelope
            .data
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();

        debug!(total, decoded = devices.len(), "listed devices");
        Ok(devices)
    }
}
