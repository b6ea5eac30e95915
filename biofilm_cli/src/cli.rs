//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "biofilm",
    version,
    about = "Biofilm risk monitor for recirculating water systems"
)]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/biofilm.toml")]
    pub config: PathBuf,

    /// Log and report as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the telemetry store and print one report per cycle
    Monitor {
        /// Run a single cycle and exit
        #[arg(long, action = ArgAction::SetTrue)]
        once: bool,
        /// Read the feed from a JSON file instead of the configured URL
        #[arg(long, value_name = "FILE")]
        feed_file: Option<PathBuf>,
    },
    /// Fetch once and write the retained history as CSV
    Export {
        /// Destination CSV file (replaced if it exists)
        #[arg(long, short, value_name = "FILE")]
        output: PathBuf,
        /// Read the feed from a JSON file instead of the configured URL
        #[arg(long, value_name = "FILE")]
        feed_file: Option<PathBuf>,
    },
    /// Inspect or change the persisted settings
    Settings {
        #[command(subcommand)]
        action: SettingsCmd,
    },
    /// Validate config and settings for operational monitoring
    Health,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCmd {
    /// Print the current settings
    Show,
    /// Set calibration offsets; omitted ones keep their value
    SetOffsets {
        /// pH offset (added to every pH reading)
        #[arg(long, value_name = "DELTA", allow_hyphen_values = true)]
        ph: Option<String>,
        /// Temperature offset in degrees C
        #[arg(long, value_name = "DELTA", allow_hyphen_values = true)]
        temperature: Option<String>,
        /// TDS offset in ppm
        #[arg(long, value_name = "DELTA", allow_hyphen_values = true)]
        tds: Option<String>,
    },
    /// Set the tank volume in liters (negative values floor at 0)
    SetVolume {
        #[arg(value_name = "LITERS", allow_hyphen_values = true)]
        liters: String,
    },
    /// Record that maintenance was performed now
    LogMaintenance,
}
