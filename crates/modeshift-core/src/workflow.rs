// ── Workflow orchestration ──
//
// Binds the six migration tasks to the session, inventory and driver, with
// user input coming from a `Prompter` and output going to a `ReportSink`.
// A `Workflow` can only be built from a `Credential`, so every task runs
// authenticated; there is no way back to the unauthenticated state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use strum::{Display, EnumIter, IntoEnumIterator};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use modeshift_api::Credential;

use crate::api::ControllerApi;
use crate::driver::{ProgressObserver, TransitionDriver};
use crate::error::CoreError;
use crate::inventory::{classify, fetch_devices, require_by_system_ip};
use crate::model::{ConfigMode, DeviceRecord, Operation, TransitionResult};
use crate::report::{DEVICE_FIELDS, ReportSink, timestamped_name};
use crate::session::{AuthSession, LoginRequest};

// ── Tasks ────────────────────────────────────────────────────────

/// The migration menu, numbered as presented to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Task {
    #[strum(serialize = "Generate list of devices in vManage (template) mode")]
    ListTemplateManaged,
    #[strum(serialize = "Generate list of devices in CLI mode")]
    ListCliManaged,
    #[strum(serialize = "Export running config of a specific device")]
    ExportOne,
    #[strum(serialize = "Export running config of all devices")]
    ExportAll,
    #[strum(serialize = "Convert a specific device to CLI mode")]
    ConvertOne,
    #[strum(serialize = "Convert all devices from vManage mode to CLI mode")]
    ConvertAll,
    #[strum(serialize = "Exit")]
    Exit,
}

impl Task {
    /// Menu number, 1 through 7.
    pub fn number(self) -> usize {
        Task::iter().position(|t| t == self).map_or(0, |i| i + 1)
    }
}

/// What a finished task produced, for the caller to present.
#[derive(Debug, Clone)]
pub enum TaskReport {
    Listed {
        mode: ConfigMode,
        devices: Vec<DeviceRecord>,
        destination: PathBuf,
    },
    Single(TransitionResult),
    Bulk {
        operation: Operation,
        results: Vec<TransitionResult>,
    },
    /// The user declined the confirmation prompt.
    Declined(Task),
    Exit,
}

impl TaskReport {
    /// `true` unless some device operation failed.
    pub fn all_succeeded(&self) -> bool {
        match self {
            Self::Single(result) => result.is_success(),
            Self::Bulk { results, .. } => results.iter().all(TransitionResult::is_success),
            Self::Listed { .. } | Self::Declined(_) | Self::Exit => true,
        }
    }
}

// ── Prompter ─────────────────────────────────────────────────────

/// Source of user input for the workflow, plus a place to show results.
///
/// Implementations hand back already-validated values; an `Err` means the
/// input channel itself failed (closed stdin, interrupted prompt).
pub trait Prompter {
    fn choose_task(&mut self) -> Result<Task, CoreError>;

    /// System IP of the device to operate on.
    fn system_ip(&mut self) -> Result<String, CoreError>;

    /// Report filename; `suggested` when the user takes the default.
    fn destination(&mut self, suggested: &str) -> Result<String, CoreError>;

    fn confirm(&mut self, message: &str) -> Result<bool, CoreError>;

    fn show_report(&mut self, _report: &TaskReport) {}

    fn show_error(&mut self, _error: &CoreError) {}
}

// ── Workflow ─────────────────────────────────────────────────────

/// An authenticated migration session against one controller.
pub struct Workflow<'a, A> {
    api: &'a A,
    credential: Credential,
    pacing: Duration,
    cancel: CancellationToken,
}

impl<'a, A: ControllerApi> Workflow<'a, A> {
    /// Authenticate and start a workflow. A failure here is final.
    pub async fn connect(api: &'a A, login: &LoginRequest, pacing: Duration) -> Result<Self, CoreError> {
        let credential = AuthSession::authenticate(api, login).await?;
        Ok(Self::from_credential(api, credential, pacing))
    }

    pub fn from_credential(api: &'a A, credential: Credential, pacing: Duration) -> Self {
        Self {
            api,
            credential,
            pacing,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop bulk runs (and the interactive loop) when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    fn driver(&self) -> TransitionDriver<'_, A> {
        TransitionDriver::new(self.api, &self.credential, self.pacing)
            .with_cancellation(self.cancel.clone())
    }

    /// Menu loop: run tasks until the user exits or the run is cancelled.
    ///
    /// Operation failures are shown and the loop continues; only fatal
    /// errors (authentication, broken input) end it.
    pub async fn run_interactive(
        &self,
        prompter: &mut dyn Prompter,
        sink: &mut dyn ReportSink,
        progress: &mut dyn ProgressObserver,
    ) -> Result<(), CoreError> {
        loop {
            let task = prompter.choose_task()?;
            if task == Task::Exit {
                return Ok(());
            }

            match self.run_task(task, prompter, sink, progress).await {
                Ok(report) => prompter.show_report(&report),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(task = %task, error = %e, "task failed");
                    prompter.show_error(&e);
                }
            }

            if self.cancel.is_cancelled() {
                debug!("cancelled; leaving menu");
                return Ok(());
            }
        }
    }

    /// Run one task to completion.
    pub async fn run_task(
        &self,
        task: Task,
        prompter: &mut dyn Prompter,
        sink: &mut dyn ReportSink,
        progress: &mut dyn ProgressObserver,
    ) -> Result<TaskReport, CoreError> {
        debug!(task = %task, "running task");
        match task {
            Task::ListTemplateManaged => {
                self.list(ConfigMode::TemplateManaged, "vManage-Mode-Devices", prompter, sink)
                    .await
            }
            Task::ListCliManaged => {
                self.list(ConfigMode::CliManaged, "CLI-Mode-Devices", prompter, sink)
                    .await
            }
            Task::ExportOne => {
                let system_ip = prompter.system_ip()?;
                let suggested = timestamped_name(system_ip.trim(), "txt", Local::now());
                let destination = prompter.destination(&suggested)?;

                let devices = fetch_devices(self.api, &self.credential).await?;
                let device = require_by_system_ip(&devices, &system_ip)?;
                let result = self
                    .driver()
                    .export_config(device, sink, Path::new(&destination))
                    .await;
                Ok(TaskReport::Single(result))
            }
            Task::ExportAll => {
                let devices = fetch_devices(self.api, &self.credential).await?;
                let results = self
                    .driver()
                    .run_bulk(&devices, Operation::ExportConfig, sink, progress)
                    .await;
                Ok(TaskReport::Bulk {
                    operation: Operation::ExportConfig,
                    results,
                })
            }
            Task::ConvertOne => {
                let system_ip = prompter.system_ip()?;
                let devices = fetch_devices(self.api, &self.credential).await?;
                let device = require_by_system_ip(&devices, &system_ip)?;
                Ok(TaskReport::Single(self.driver().convert_to_cli(device).await))
            }
            Task::ConvertAll => {
                let devices = fetch_devices(self.api, &self.credential).await?;
                let targets = classify(&devices, ConfigMode::TemplateManaged);
                if !targets.is_empty() {
                    let question = format!(
                        "Convert {} template-managed device(s) to CLI mode?",
                        targets.len()
                    );
                    if !prompter.confirm(&question)? {
                        return Ok(TaskReport::Declined(task));
                    }
                }
                let results = self
                    .driver()
                    .run_bulk(&targets, Operation::ConvertToCli, sink, progress)
                    .await;
                Ok(TaskReport::Bulk {
                    operation: Operation::ConvertToCli,
                    results,
                })
            }
            Task::Exit => Ok(TaskReport::Exit),
        }
    }

    async fn list(
        &self,
        mode: ConfigMode,
        label: &str,
        prompter: &mut dyn Prompter,
        sink: &mut dyn ReportSink,
    ) -> Result<TaskReport, CoreError> {
        let suggested = timestamped_name(label, "csv", Local::now());
        let destination = prompter.destination(&suggested)?;

        let devices = fetch_devices(self.api, &self.credential).await?;
        let selected = classify(&devices, mode);
        let written = sink.write_records(&selected, &DEVICE_FIELDS, Path::new(&destination))?;

        Ok(TaskReport::Listed {
            mode,
            devices: selected,
            destination: written,
        })
    }
}
