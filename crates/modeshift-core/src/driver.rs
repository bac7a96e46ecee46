// ── Transition driver ──
//
// Sequences export / convert operations across devices, one at a time,
// with a fixed pause between devices so the controller is not flooded.
// Per-device failures are captured in that device's result and the run
// moves on. A cancellation token is checked before every device and
// during every pause.

use std::path::Path;
use std::time::Duration;

use chrono::Local;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use modeshift_api::{Credential, ModeChangeRequest};

use crate::api::ControllerApi;
use crate::inventory::fetch_running_config;
use crate::model::{DeviceRecord, Operation, TransitionResult};
use crate::report::{ReportSink, timestamped_name};

/// Receives bulk-run progress, one call per finished device.
pub trait ProgressObserver {
    fn started(&mut self, _operation: Operation, _total: usize) {}
    fn advanced(&mut self, index: usize, result: &TransitionResult);
    fn finished(&mut self) {}
}

/// Discards progress.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn advanced(&mut self, _index: usize, _result: &TransitionResult) {}
}

/// Runs per-device operations against one authenticated controller.
pub struct TransitionDriver<'a, A> {
    api: &'a A,
    credential: &'a Credential,
    pacing: Duration,
    cancel: CancellationToken,
}

impl<'a, A: ControllerApi> TransitionDriver<'a, A> {
    pub fn new(api: &'a A, credential: &'a Credential, pacing: Duration) -> Self {
        Self {
            api,
            credential,
            pacing,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned token (e.g. cancelled on Ctrl-C).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fetch a device's running config and append it to `destination`.
    pub async fn export_config(
        &self,
        device: &DeviceRecord,
        sink: &mut dyn ReportSink,
        destination: &Path,
    ) -> TransitionResult {
        let op = Operation::ExportConfig;

        let config = match fetch_running_config(self.api, self.credential, device).await {
            Ok(config) => config,
            Err(e) => {
                warn!(device = %device.label(), error = %e, "running config fetch failed");
                return TransitionResult::failed(device, op, e.to_string());
            }
        };

        match sink.append_text(&config, destination) {
            Ok(written) => {
                info!(device = %device.label(), path = %written.display(), "exported running config");
                TransitionResult::completed(device, op, format!("wrote {}", written.display()))
            }
            Err(e) => {
                warn!(device = %device.label(), error = %e, "writing running config failed");
                TransitionResult::failed(device, op, e.to_string())
            }
        }
    }

    /// Request the template → CLI mode switch for one device.
    ///
    /// Success is `Outcome::Accepted`: the controller has queued the change,
    /// the device has not necessarily switched yet.
    pub async fn convert_to_cli(&self, device: &DeviceRecord) -> TransitionResult {
        let op = Operation::ConvertToCli;

        if device.chassis_id.is_empty() {
            warn!(device = %device.label(), "no chassis number; not converting");
            return TransitionResult::failed(device, op, "device has no chassis number");
        }

        let request = ModeChangeRequest::single(&device.chassis_id, &device.system_ip);
        match self.api.request_cli_mode(self.credential, &request).await {
            Ok(ack) => {
                info!(
                    device = %device.label(),
                    status = ack.status,
                    task = ack.task_id.as_deref().unwrap_or("-"),
                    "CLI mode change accepted"
                );
                let detail = match ack.task_id {
                    Some(task) => format!("accepted by controller, task {task} in progress"),
                    None => "accepted by controller, conversion in progress".to_owned(),
                };
                TransitionResult::accepted(device, op, detail)
            }
            Err(e) => {
                warn!(device = %device.label(), error = %e, "CLI mode change rejected");
                TransitionResult::failed(device, op, e.to_string())
            }
        }
    }

    /// Apply `operation` to every device in order, pausing between devices.
    ///
    /// Always returns one result per input device, in input order. Devices
    /// not reached before cancellation are reported as skipped. Bulk exports
    /// go to `<system-ip>-<timestamp>.txt`.
    pub async fn run_bulk(
        &self,
        devices: &[DeviceRecord],
        operation: Operation,
        sink: &mut dyn ReportSink,
        progress: &mut dyn ProgressObserver,
    ) -> Vec<TransitionResult> {
        info!(%operation, devices = devices.len(), pacing = ?self.pacing, "starting bulk run");
        progress.started(operation, devices.len());

        let mut results = Vec::with_capacity(devices.len());
        for (index, device) in devices.iter().enumerate() {
            if index > 0 {
                self.pause().await;
            }

            let result = if self.cancel.is_cancelled() {
                TransitionResult::skipped(device, operation)
            } else {
                match operation {
                    Operation::ExportConfig => {
                        let name = timestamped_name(&device.system_ip, "txt", Local::now());
                        self.export_config(device, sink, Path::new(&name)).await
                    }
                    Operation::ConvertToCli => self.convert_to_cli(device).await,
                }
            };

            progress.advanced(index, &result);
            results.push(result);
        }

        progress.finished();
        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!(%operation, total = results.len(), failed, "bulk run finished");
        results
    }

    /// Sleep for the pacing interval, waking early on cancellation.
    async fn pause(&self) {
        if self.cancel.is_cancelled() || self.pacing.is_zero() {
            return;
        }
        debug!(pacing = ?self.pacing, "pacing before next device");
        tokio::select! {
            () = self.cancel.cancelled() => debug!("pause interrupted by cancellation"),
            () = tokio::time::sleep(self.pacing) => {}
        }
    }
}
