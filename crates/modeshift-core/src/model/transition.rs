use serde::Serialize;
use strum::Display;

use super::device::DeviceRecord;

/// Per-device operation the driver can sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Operation {
    #[strum(serialize = "export-config")]
    ExportConfig,
    #[strum(serialize = "convert-to-cli")]
    ConvertToCli,
}

/// How one device's operation ended.
///
/// `Accepted` is deliberately distinct from `Completed`: the controller
/// runs mode changes as background tasks, so a 2xx only means queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Outcome {
    /// Done on our side (running config written).
    #[strum(serialize = "completed")]
    Completed,
    /// Request accepted by the controller; convergence pending.
    #[strum(serialize = "accepted")]
    Accepted,
    #[strum(serialize = "failed")]
    Failed,
    /// Not attempted because the run was cancelled first.
    #[strum(serialize = "skipped")]
    Skipped,
}

/// Result of one operation on one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionResult {
    pub device: DeviceRecord,
    pub operation: Operation,
    pub outcome: Outcome,
    pub detail: Option<String>,
}

impl TransitionResult {
    pub fn completed(device: &DeviceRecord, operation: Operation, detail: impl Into<String>) -> Self {
        Self::new(device, operation, Outcome::Completed, Some(detail.into()))
    }

    pub fn accepted(device: &DeviceRecord, operation: Operation, detail: impl Into<String>) -> Self {
        Self::new(device, operation, Outcome::Accepted, Some(detail.into()))
    }

    pub fn failed(device: &DeviceRecord, operation: Operation, detail: impl Into<String>) -> Self {
        Self::new(device, operation, Outcome::Failed, Some(detail.into()))
    }

    pub fn skipped(device: &DeviceRecord, operation: Operation) -> Self {
        Self::new(device, operation, Outcome::Skipped, Some("run cancelled".into()))
    }

    fn new(
        device: &DeviceRecord,
        operation: Operation,
        outcome: Outcome,
        detail: Option<String>,
    ) -> Self {
        Self {
            device: device.clone(),
            operation,
            outcome,
            detail,
        }
    }

    /// `Completed` or `Accepted`.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Completed | Outcome::Accepted)
    }

    /// `true` when the controller still has work to do for this device.
    pub fn awaits_convergence(&self) -> bool {
        self.outcome == Outcome::Accepted
    }
}
