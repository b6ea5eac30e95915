#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod error_fmt;
mod notify;
mod report;
mod sources;

use biofilm_config::Config;
use biofilm_core::error::{MonitorError, Result};
use biofilm_core::export;
use biofilm_core::{
    CalibrationOffsets, FileSettingsStore, Flow, Monitor, MonitorCfg, PollScheduler,
    SettingsStore,
};
use clap::Parser;
use cli::{Cli, Commands, FILE_GUARD, JSON_MODE, SettingsCmd};
use error_fmt::{exit_code_for_error, format_error_json, humanize};
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    color_eyre::install()?;

    let cfg = load_config(&cli.config)?;
    init_tracing(&cli, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    match cli.cmd {
        Commands::Monitor { once, feed_file } => {
            let mut monitor = build_monitor(&cfg, feed_file.as_deref(), true)?;
            if once {
                emit(&monitor.run_cycle(), cli.json);
                return Ok(());
            }
            let scheduler = PollScheduler::new(monitor.config().poll_interval);
            let handle = scheduler.cancel_handle();
            ctrlc::set_handler(move || handle.cancel())
                .map_err(|e| eyre::eyre!("install Ctrl-C handler: {e}"))?;
            tracing::info!(
                interval_ms = u64::try_from(scheduler.interval().as_millis()).unwrap_or(u64::MAX),
                "monitor started"
            );
            let cycles = scheduler.run(|| {
                emit(&monitor.run_cycle(), cli.json);
                Flow::Continue
            });
            tracing::info!(cycles, "monitor stopped");
            Ok(())
        }
        Commands::Export { output, feed_file } => {
            // No notifier: exporting must never raise an alert
            let mut monitor = build_monitor(&cfg, feed_file.as_deref(), false)?;
            let report = monitor.run_cycle();
            if let biofilm_core::FetchStatus::Failed(reason) = &report.fetch {
                return Err(MonitorError::Feed(reason.clone()).into());
            }
            let rows = export::export_to_path(monitor.window(), &output)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "rows": rows, "path": output.display().to_string() })
                );
            } else {
                println!("exported {rows} rows to {}", output.display());
            }
            Ok(())
        }
        Commands::Settings { action } => run_settings(&cfg, action, cli.json),
        Commands::Health => {
            let store = FileSettingsStore::new(&cfg.settings.path);
            store
                .load()
                .map_err(|e| MonitorError::Settings(format!("{e:#}")))?;
            if cli.json {
                println!("{}", serde_json::json!({ "status": "ok" }));
            } else {
                println!("ok");
            }
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("read {}: {e}", path.display())))?;
    let cfg = biofilm_config::load_toml(&text)
        .map_err(|e| MonitorError::Config(format!("parse {}: {e}", path.display())))?;
    cfg.validate()
        .map_err(|e| MonitorError::Config(e.to_string()))?;
    Ok(cfg)
}

/// Console goes to stderr so stdout carries only reports. `RUST_LOG` wins over `--log-level`.
fn init_tracing(cli: &Cli, logging: &biofilm_config::Logging) -> Result<()> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let mut layers = Vec::new();
    if cli.json {
        layers.push(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(console_filter)
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(console_filter)
                .boxed(),
        );
    }

    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "biofilm.log".into(), |n| n.to_os_string());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        let level = logging.level.as_deref().unwrap_or("info");
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(level))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| eyre::eyre!("init tracing: {e}"))
}

fn build_monitor(cfg: &Config, feed_file: Option<&Path>, alerts: bool) -> Result<Monitor> {
    let builder = Monitor::builder()
        .with_settings_store(FileSettingsStore::new(&cfg.settings.path))
        .with_config(MonitorCfg::from(cfg));
    let builder = if alerts {
        builder.with_notifier(notify::LogNotifier)
    } else {
        builder
    };
    match feed_file {
        Some(path) => builder.with_source(sources::FileFeed::new(path)).build(),
        None => builder.with_source(sources::HttpFeed::new(&cfg.feed)).build(),
    }
}

fn emit(report: &biofilm_core::CycleReport, json: bool) {
    if json {
        println!("{}", report::cycle_json(report));
    } else {
        println!("{}", report::cycle_text(report));
    }
}

fn run_settings(cfg: &Config, action: SettingsCmd, json: bool) -> Result<()> {
    let mut store = FileSettingsStore::new(&cfg.settings.path);
    let mut settings = store
        .load()
        .map_err(|e| MonitorError::Settings(format!("{e:#}")))?;

    let changed = match action {
        SettingsCmd::Show => false,
        SettingsCmd::SetOffsets {
            ph,
            temperature,
            tds,
        } => {
            if ph.is_none() && temperature.is_none() && tds.is_none() {
                return Err(MonitorError::Settings(
                    "no offset given; pass --ph, --temperature or --tds".to_string(),
                )
                .into());
            }
            let parse = |v: Option<String>, current: f64| -> Result<f64> {
                match v {
                    Some(s) => biofilm_config::parse_offset(&s)
                        .map_err(|e| MonitorError::Settings(e.to_string()).into()),
                    None => Ok(current),
                }
            };
            let offsets = CalibrationOffsets {
                ph: parse(ph, settings.offsets.ph)?,
                temperature: parse(temperature, settings.offsets.temperature)?,
                tds: parse(tds, settings.offsets.tds)?,
            };
            settings.set_offsets(offsets)?;
            true
        }
        SettingsCmd::SetVolume { liters } => {
            let v = biofilm_config::parse_volume(&liters)
                .map_err(|e| MonitorError::Settings(e.to_string()))?;
            settings.set_tank_volume_l(f64::from(v))?;
            true
        }
        SettingsCmd::LogMaintenance => {
            settings.log_maintenance(chrono::Utc::now());
            true
        }
    };

    if changed {
        store.save(&settings)?;
        tracing::info!(path = %cfg.settings.path, "settings saved");
    }
    if json {
        println!("{}", report::settings_json(&settings));
    } else {
        println!("{}", report::settings_text(&settings));
    }
    Ok(())
}
