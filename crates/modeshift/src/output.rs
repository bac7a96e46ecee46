//! Output formatting: device tables, result summaries, CSV and JSON.

use std::io::{self, IsTerminal, Write};
use std::net::SocketAddr;

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use modeshift_core::{
    ControllerConfig, DEVICE_FIELDS, DeviceRecord, Outcome, TaskReport, TransitionResult,
};

use crate::cli::ListFormat;
use crate::error::CliError;

/// Color only for an interactive stdout without `NO_COLOR`.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

// ── Rows ─────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "System IP")]
    system_ip: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Template")]
    template: String,
    #[tabled(rename = "Connection")]
    connection: String,
    #[tabled(rename = "Chassis")]
    chassis: String,
}

impl From<&DeviceRecord> for DeviceRow {
    fn from(d: &DeviceRecord) -> Self {
        Self {
            host: d.host_name.clone(),
            system_ip: d.system_ip.clone(),
            mode: d.config_mode.to_string(),
            template: d.attached_template.clone(),
            connection: d.connection_state.clone(),
            chassis: d.chassis_id.clone(),
        }
    }
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl ResultRow {
    fn new(result: &TransitionResult, color: bool) -> Self {
        Self {
            device: result.device.label(),
            outcome: paint_outcome(result.outcome, color),
            detail: result.detail.clone().unwrap_or_default(),
        }
    }
}

fn paint_outcome(outcome: Outcome, color: bool) -> String {
    let text = outcome.to_string();
    if !color {
        return text;
    }
    match outcome {
        Outcome::Completed => text.green().to_string(),
        Outcome::Accepted => text.cyan().to_string(),
        Outcome::Failed => text.red().to_string(),
        Outcome::Skipped => text.yellow().to_string(),
    }
}

// ── Renderers ────────────────────────────────────────────────────────

/// Render a device listing for stdout.
pub fn render_devices(format: ListFormat, devices: &[DeviceRecord]) -> Result<String, CliError> {
    match format {
        ListFormat::Table => Ok(render_table(devices.iter().map(DeviceRow::from))),
        ListFormat::Json => Ok(serde_json::to_string_pretty(devices)?),
        ListFormat::Csv => render_csv(devices),
    }
}

fn render_csv(devices: &[DeviceRecord]) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(DEVICE_FIELDS).map_err(io::Error::other)?;
    for d in devices {
        let mode = d.config_mode.to_string();
        writer
            .write_record([
                d.host_name.as_str(),
                d.system_ip.as_str(),
                mode.as_str(),
                d.attached_template.as_str(),
                d.connection_state.as_str(),
                d.chassis_id.as_str(),
            ])
            .map_err(io::Error::other)?;
    }
    let bytes = writer.into_inner().map_err(|e| io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).trim_end().to_owned())
}

/// Per-device table plus a one-line tally.
pub fn render_results(results: &[TransitionResult], color: bool) -> String {
    if results.is_empty() {
        return "No devices to process.".into();
    }
    let table = render_table(results.iter().map(|r| ResultRow::new(r, color)));
    format!("{table}\n{}", summary_line(results))
}

fn summary_line(results: &[TransitionResult]) -> String {
    let count = |o: Outcome| results.iter().filter(|r| r.outcome == o).count();
    let mut parts = Vec::new();
    for outcome in [Outcome::Completed, Outcome::Accepted, Outcome::Failed, Outcome::Skipped] {
        let n = count(outcome);
        if n > 0 {
            parts.push(format!("{n} {outcome}"));
        }
    }
    let mut line = format!("{} device(s): {}", results.len(), parts.join(", "));
    if results.iter().any(TransitionResult::awaits_convergence) {
        line.push_str("\nAccepted mode changes run as controller tasks; check the controller's task view for completion.");
    }
    line
}

/// Human summary of a finished menu task.
pub fn render_report(report: &TaskReport, color: bool) -> String {
    match report {
        TaskReport::Listed {
            mode,
            devices,
            destination,
        } => format!(
            "{}\n{} device(s) in {mode} mode written to {}",
            render_table(devices.iter().map(DeviceRow::from)),
            devices.len(),
            destination.display()
        ),
        TaskReport::Single(result) => render_results(std::slice::from_ref(result), color),
        TaskReport::Bulk { results, .. } => render_results(results, color),
        TaskReport::Declined(task) => format!("Cancelled: {task}"),
        TaskReport::Exit => String::new(),
    }
}

fn render_table<R: Tabled>(rows: impl IntoIterator<Item = R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One-line confirmation shown once the login handshake succeeds.
pub fn login_banner(controller: &ControllerConfig, username: &str) -> String {
    let endpoint = SocketAddr::new(controller.address, controller.port);
    format!("Logged in to {endpoint} as {username}")
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use modeshift_core::{ConfigMode, Operation};

    fn device(host: &str, ip: &str) -> DeviceRecord {
        DeviceRecord {
            host_name: host.into(),
            system_ip: ip.into(),
            config_mode: ConfigMode::CliManaged,
            attached_template: "no-template-attached".into(),
            connection_state: "connected".into(),
            chassis_id: "C8K-1".into(),
        }
    }

    #[test]
    fn login_banner_names_controller_and_user() {
        let v4 = ControllerConfig::new("10.10.20.90".parse().unwrap());
        assert_eq!(login_banner(&v4, "admin"), "Logged in to 10.10.20.90:8443 as admin");

        let mut v6 = ControllerConfig::new("fd00::10".parse().unwrap());
        v6.port = 443;
        assert_eq!(login_banner(&v6, "ops"), "Logged in to [fd00::10]:443 as ops");
    }

    #[test]
    fn csv_output_uses_controller_field_names() {
        let out = render_devices(ListFormat::Csv, &[device("edge1", "10.0.0.1")]).unwrap();
        assert_eq!(
            out,
            "host-name,system-ip,configOperationMode,template,vmanageConnectionState,chasisNumber\n\
             edge1,10.0.0.1,cli,no-template-attached,connected,C8K-1"
        );
    }

    #[test]
    fn json_output_round_trips_records() {
        let out = render_devices(ListFormat::Json, &[device("edge1", "10.0.0.1")]).unwrap();
        let parsed: Vec<DeviceRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec![device("edge1", "10.0.0.1")]);
    }

    #[test]
    fn summary_counts_outcomes_and_flags_pending_tasks() {
        let d = device("edge1", "10.0.0.1");
        let results = vec![
            TransitionResult::accepted(&d, Operation::ConvertToCli, "task 1"),
            TransitionResult::failed(&d, Operation::ConvertToCli, "HTTP 500"),
        ];
        let out = render_results(&results, false);
        assert!(out.contains("2 device(s): 1 accepted, 1 failed"), "{out}");
        assert!(out.contains("controller tasks"));
        assert!(out.contains("HTTP 500"));
    }

    #[test]
    fn empty_bulk_run_says_so() {
        assert_eq!(render_results(&[], false), "No devices to process.");
    }
}
