//! Command dispatch for an authenticated session.
//!
//! Subcommands run a single workflow task with their arguments standing in
//! for the interactive prompts; `menu` hands control to the task loop.

use modeshift_core::{
    ConfigMode, ControllerApi, Outcome, ProgressObserver, ReportSink, Task, TaskReport, Workflow,
};

use crate::cli::{Command, GlobalOpts, ListArgs, ListFormat, ModeFilter};
use crate::error::CliError;
use crate::output;
use crate::prompt::{ArgsPrompter, MenuPrompter};

pub async fn dispatch<A: ControllerApi>(
    cmd: Command,
    workflow: &Workflow<'_, A>,
    sink: &mut dyn ReportSink,
    progress: &mut dyn ProgressObserver,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (task, mut prompter, format) = match cmd {
        Command::Menu => {
            let mut prompter = MenuPrompter::new(global.yes, global.quiet);
            workflow.run_interactive(&mut prompter, sink, progress).await?;
            return Ok(());
        }
        Command::List(ListArgs { mode, file, format }) => {
            let task = match mode {
                ModeFilter::Template => Task::ListTemplateManaged,
                ModeFilter::Cli => Task::ListCliManaged,
            };
            let prompter = ArgsPrompter {
                destination: file,
                ..ArgsPrompter::default()
            };
            (task, prompter, format)
        }
        Command::Export(args) => (
            Task::ExportOne,
            ArgsPrompter {
                system_ip: Some(args.system_ip),
                destination: args.file,
                yes: global.yes,
            },
            ListFormat::Table,
        ),
        Command::ExportAll => (Task::ExportAll, ArgsPrompter::default(), ListFormat::Table),
        Command::Convert(args) => (
            Task::ConvertOne,
            ArgsPrompter {
                system_ip: Some(args.system_ip),
                ..ArgsPrompter::default()
            },
            ListFormat::Table,
        ),
        Command::ConvertAll => (
            Task::ConvertAll,
            ArgsPrompter {
                yes: global.yes,
                ..ArgsPrompter::default()
            },
            ListFormat::Table,
        ),
        // Handled before a session is opened.
        Command::Completions(_) => return Ok(()),
    };

    let report = workflow.run_task(task, &mut prompter, sink, progress).await?;
    present(&report, format, global)?;
    outcome_to_result(&report)
}

fn present(report: &TaskReport, format: ListFormat, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color();
    let rendered = match report {
        TaskReport::Listed {
            mode,
            devices,
            destination,
        } => {
            if !global.quiet {
                eprintln!(
                    "{} {} device(s) written to {}",
                    devices.len(),
                    mode_label(*mode),
                    destination.display()
                );
            }
            output::render_devices(format, devices)?
        }
        other => output::render_report(other, color),
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn mode_label(mode: ConfigMode) -> &'static str {
    match mode {
        ConfigMode::TemplateManaged => "template-mode",
        ConfigMode::CliManaged => "CLI-mode",
        ConfigMode::Unknown => "unknown-mode",
    }
}

/// Map device failures onto an error so they reach the exit code.
fn outcome_to_result(report: &TaskReport) -> Result<(), CliError> {
    match report {
        TaskReport::Single(result) if result.outcome == Outcome::Failed => {
            Err(CliError::DeviceFailed {
                operation: result.operation.to_string(),
                device: result.device.label(),
                detail: result.detail.clone().unwrap_or_default(),
            })
        }
        TaskReport::Bulk { operation, results } if !report.all_succeeded() => {
            Err(CliError::PartialFailure {
                operation: operation.to_string(),
                failed: results.iter().filter(|r| !r.is_success()).count(),
                total: results.len(),
            })
        }
        _ => Ok(()),
    }
}
