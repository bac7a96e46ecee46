//! Filesystem report sink: CSV device listings and appended config dumps.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use modeshift_core::{CoreError, DeviceRecord, ReportSink};

/// Writes reports under `output_dir`. Absolute destinations are used as is.
pub struct FileReportSink {
    output_dir: PathBuf,
}

impl FileReportSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn resolve(&self, destination: &Path) -> Result<PathBuf, CoreError> {
        let path = if destination.is_absolute() {
            destination.to_path_buf()
        } else {
            self.output_dir.join(destination)
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| report_err(&path, e))?;
            }
        }
        Ok(path)
    }
}

impl ReportSink for FileReportSink {
    fn write_records(
        &mut self,
        records: &[DeviceRecord],
        field_names: &[&str],
        destination: &Path,
    ) -> Result<PathBuf, CoreError> {
        let path = self.resolve(destination)?;
        let mut writer = csv::Writer::from_path(&path).map_err(|e| report_err(&path, e))?;

        writer
            .write_record(field_names)
            .map_err(|e| report_err(&path, e))?;
        for record in records {
            let row = record_row(record, field_names).map_err(|e| report_err(&path, e))?;
            writer.write_record(&row).map_err(|e| report_err(&path, e))?;
        }
        writer.flush().map_err(|e| report_err(&path, e))?;

        info!(path = %path.display(), rows = records.len(), "wrote device report");
        Ok(path)
    }

    fn append_text(&mut self, text: &str, destination: &Path) -> Result<PathBuf, CoreError> {
        let path = self.resolve(destination)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| report_err(&path, e))?;

        file.write_all(text.as_bytes())
            .map_err(|e| report_err(&path, e))?;
        if !text.ends_with('\n') {
            file.write_all(b"\n").map_err(|e| report_err(&path, e))?;
        }

        info!(path = %path.display(), bytes = text.len(), "appended config");
        Ok(path)
    }
}

/// Pick `field_names` out of the record's serialized form, in order.
///
/// Records serialize with the controller's field names, so the header row
/// and the columns always agree. Unknown names produce empty cells.
fn record_row(record: &DeviceRecord, field_names: &[&str]) -> Result<Vec<String>, serde_json::Error> {
    let value = serde_json::to_value(record)?;
    Ok(field_names
        .iter()
        .map(|name| match value.get(*name) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        })
        .collect())
}

fn report_err(path: &Path, err: impl std::fmt::Display) -> CoreError {
    CoreError::Report {
        destination: path.display().to_string(),
        reason: err.to_string(),
    }
}
