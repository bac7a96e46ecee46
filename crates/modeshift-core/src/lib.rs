// modeshift-core: Session, inventory and transition workflow between modeshift-api and the CLI.

pub mod api;
pub mod config;
pub mod convert;
pub mod driver;
pub mod error;
pub mod inventory;
pub mod model;
pub mod report;
pub mod session;
pub mod workflow;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::ControllerApi;
pub use config::{ControllerConfig, TlsVerification, parse_controller_address};
pub use driver::{NoProgress, ProgressObserver, TransitionDriver};
pub use error::CoreError;
pub use report::{DEVICE_FIELDS, ReportSink, timestamped_name};
pub use session::{AuthSession, LoginRequest};
pub use workflow::{Prompter, Task, TaskReport, Workflow};

pub use modeshift_api::Credential;

// Re-export model types at the crate root for ergonomics.
pub use model::{ConfigMode, DeviceRecord, Operation, Outcome, TransitionResult};
