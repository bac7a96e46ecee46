mod cli;
mod commands;
mod config;
mod error;
mod output;
mod progress;
mod prompt;
mod report;

use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use modeshift_core::Workflow;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::progress::BarProgress;
use crate::report::FileReportSink;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let command = cli.command.unwrap_or(Command::Menu);

    if let Command::Completions(args) = command {
        let mut cmd = Cli::command();
        clap_complete::generate(args.shell, &mut cmd, "modeshift", &mut std::io::stdout());
        return Ok(());
    }

    let global = &cli.global;
    let cfg = modeshift_config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let controller = config::controller_config(global, &cfg, &profile_name)?;
    let client = controller.client()?;
    let login = config::login_request(global, &cfg, &profile_name)?;

    let cancel = CancellationToken::new();
    watch_interrupts(cancel.clone());

    let workflow = Workflow::connect(&client, &login, controller.pacing)
        .await?
        .with_cancellation(cancel);

    if matches!(command, Command::Menu) && !global.quiet {
        eprintln!("{}", output::login_banner(&controller, &login.username));
    }

    let mut sink = FileReportSink::new(controller.output_dir.clone());
    let mut progress = BarProgress::new(global.quiet);

    debug!(command = ?command, profile = %profile_name, "dispatching command");
    commands::dispatch(command, &workflow, &mut sink, &mut progress, global).await
}

/// First Ctrl-C stops bulk runs after the current device; the second exits.
fn watch_interrupts(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("interrupted; stopping after the current device (Ctrl-C again to quit now)");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}
