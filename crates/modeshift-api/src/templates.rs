// Template configuration endpoints
//
// Running-config retrieval and the template → CLI mode switch, both keyed
// by chassis number.

use serde::Deserialize;
use tracing::debug;

use crate::auth::Credential;
use crate::client::{ManagerClient, decode};
use crate::error::Error;
use crate::models::{ModeChangeAck, ModeChangeRequest, RunningConfig};

const RUNNING_CONFIG_PATH: &str = "/dataservice/template/config/running";
const MODE_CLI_PATH: &str = "/dataservice/template/config/device/mode/cli";

/// Task handle the controller may return for a mode change.
#[derive(Debug, Deserialize)]
struct TaskHandle {
    #[serde(default)]
    id: Option<String>,
}

impl ManagerClient {
    /// Fetch a device's running configuration as plain text.
    ///
    /// `GET /dataservice/template/config/running/{chassisId}`
    pub async fn running_config(
        &self,
        credential: &Credential,
        chassis_id: &str,
    ) -> Result<String, Error> {
        let path = format!("{RUNNING_CONFIG_PATH}/{chassis_id}");
        debug!(chassis_id, "fetching running config");
        let body: RunningConfig = self.get_json(credential, &path).await?;
        Ok(body.config)
    }

    /// Ask the controller to move devices from template to CLI mode.
    ///
    /// `POST /dataservice/template/config/device/mode/cli`. A 2xx answer
    /// means the request was queued, not that the devices have switched.
    pub async fn request_cli_mode(
        &self,
        credential: &Credential,
        request: &ModeChangeRequest,
    ) -> Result<ModeChangeAck, Error> {
        debug!(devices = request.devices.len(), "requesting CLI mode");
        let (status, body) = self.post_json(credential, MODE_CLI_PATH, request).await?;

        let task_id = if body.trim().is_empty() {
            None
        } else {
            decode::<TaskHandle>(&body).ok().and_then(|t| t.id)
        };

        Ok(ModeChangeAck { status, task_id })
    }
}
