// ── Report output seam ──
//
// The workflow hands ordered records and config text to a `ReportSink`;
// where and how they land on disk is the consumer's business.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::CoreError;
use crate::model::DeviceRecord;

/// Column order for device listings.
pub const DEVICE_FIELDS: [&str; 6] = [
    "host-name",
    "system-ip",
    "configOperationMode",
    "template",
    "vmanageConnectionState",
    "chasisNumber",
];

/// Consumer of workflow output.
pub trait ReportSink {
    /// Write `records` as a table with the given header row, replacing
    /// `destination`. Returns the path actually written.
    fn write_records(
        &mut self,
        records: &[DeviceRecord],
        field_names: &[&str],
        destination: &Path,
    ) -> Result<PathBuf, CoreError>;

    /// Append raw text to `destination`. Returns the path actually written.
    fn append_text(&mut self, text: &str, destination: &Path) -> Result<PathBuf, CoreError>;
}

/// `<label>-<DDMMYYYY-HHMMSS>.<ext>`
pub fn timestamped_name(label: &str, ext: &str, at: DateTime<Local>) -> String {
    format!("{label}-{}.{ext}", at.format("%d%m%Y-%H%M%S"))
}
