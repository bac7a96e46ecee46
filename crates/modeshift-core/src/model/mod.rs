// ── Domain model ──
//
// Canonical types the workflow operates on, independent of the controller's
// wire format. `convert` builds them from `modeshift_api` responses.

pub mod device;
pub mod transition;

pub use device::{ConfigMode, DeviceRecord, NO_TEMPLATE};
pub use transition::{Operation, Outcome, TransitionResult};
