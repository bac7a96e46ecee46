//! Clap derive structures for the `modeshift` CLI.
//!
//! Only depends on clap, clap_complete and humantime so `build.rs` can
//! include it for man page generation.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// modeshift -- move SD-WAN edges from vManage templates to CLI mode
#[derive(Debug, Parser)]
#[command(
    name = "modeshift",
    version,
    about = "Bulk template-to-CLI mode migration for SD-WAN vManage controllers",
    long_about = "Lists edge devices by configuration mode, exports running configs,\n\
        and switches devices from vManage (template) mode to CLI mode,\n\
        one device at a time with a pause between devices.\n\n\
        Without a subcommand, starts the interactive menu.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "MODESHIFT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller IP address (overrides profile)
    #[arg(long, short = 'c', env = "MODESHIFT_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Controller HTTPS port [default: 8443]
    #[arg(long, env = "MODESHIFT_PORT", global = true)]
    pub port: Option<u16>,

    /// Login username (prompted when missing)
    #[arg(long, short = 'u', env = "MODESHIFT_USERNAME", global = true)]
    pub username: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MODESHIFT_INSECURE", global = true)]
    pub insecure: bool,

    /// PEM file with the CA that signed the controller certificate
    #[arg(long, env = "MODESHIFT_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds [default: 30]
    #[arg(
        long,
        env = "MODESHIFT_TIMEOUT",
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout: Option<u64>,

    /// Pause between devices in bulk runs, e.g. "5s", "1m" [default: 5s]
    #[arg(long, env = "MODESHIFT_PACING", value_parser = humantime::parse_duration, global = true)]
    pub pacing: Option<Duration>,

    /// Directory for reports and exported configs
    #[arg(long, short = 'd', env = "MODESHIFT_OUTPUT_DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive task menu (default)
    Menu,

    /// List devices in one configuration mode and write a CSV report
    #[command(alias = "ls")]
    List(ListArgs),

    /// Export the running config of one device
    Export(ExportArgs),

    /// Export the running config of every device
    ExportAll,

    /// Switch one device to CLI mode
    Convert(ConvertArgs),

    /// Switch every template-managed device to CLI mode
    ConvertAll,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeFilter {
    /// Devices whose config is pushed by vManage templates
    Template,
    /// Devices managed from their own CLI
    Cli,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Pretty table
    Table,
    /// CSV with controller field names
    Csv,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Configuration mode to list
    #[arg(long, short = 'm', value_enum)]
    pub mode: ModeFilter,

    /// Report filename [default: <label>-<DDMMYYYY-HHMMSS>.csv]
    #[arg(long, short = 'f')]
    pub file: Option<String>,

    /// How to print the list on stdout
    #[arg(long, value_enum, default_value = "table")]
    pub format: ListFormat,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// System IP of the device
    #[arg(long, short = 's')]
    pub system_ip: String,

    /// Output filename [default: <system-ip>-<DDMMYYYY-HHMMSS>.txt]
    #[arg(long, short = 'f')]
    pub file: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// System IP of the device
    #[arg(long, short = 's')]
    pub system_ip: String,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
