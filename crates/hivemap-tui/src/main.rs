//! `hivemap-tui`: terminal map of simulated infrastructure facilities.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive state from
//! `hivemap-core`'s [`Dashboard`](hivemap_core::Dashboard). Two screens,
//! navigable via number keys: a Braille world map with overlay layers and a
//! filterable facility table. Enter on a facility opens its control
//! terminal, fed by a live telemetry simulation.
//!
//! Logs are written to a file (default `/tmp/hivemap-tui.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod filter_panel;
mod screen;
mod screens;
mod terminal_view;
mod theme;
mod tui;
mod widgets;

#[cfg(test)]
mod testing;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hivemap_core::{Dashboard, DashboardConfig, FixtureSource, Locale};

use crate::app::App;

/// Terminal map of infrastructure facilities with live control terminals.
#[derive(Parser, Debug)]
#[command(name = "hivemap-tui", version, about)]
struct Cli {
    /// Configuration profile to use
    #[arg(short = 'p', long, env = "HIVEMAP_PROFILE")]
    profile: Option<String>,

    /// Fixture URL or file path (overrides profile)
    #[arg(short = 's', long, env = "HIVEMAP_SOURCE")]
    source: Option<String>,

    /// Display language (en, de)
    #[arg(long, env = "HIVEMAP_LANG")]
    lang: Option<Locale>,

    /// Fetch timeout in seconds (no timeout by default)
    #[arg(long, env = "HIVEMAP_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path (defaults to /tmp/hivemap-tui.log)
    #[arg(long, default_value = "/tmp/hivemap-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing; stdout belongs to the TUI. Hold the returned guard
/// for the lifetime of the app so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("hivemap_tui={log_level},hivemap_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("hivemap-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Profile from the shared config file, then flag overrides. A missing
/// config file means built-in defaults.
fn resolve_config(cli: &Cli) -> Result<DashboardConfig> {
    let cfg = hivemap_config::load_config_or_default();
    let profile_name = cli
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());
    let profile = cfg.profile(&profile_name)?;
    let mut resolved = hivemap_config::profile_to_dashboard_config(&profile, &cfg.defaults)?;

    if let Some(ref raw) = cli.source {
        resolved.source =
            FixtureSource::parse(raw).map_err(|e| eyre!("invalid --source {raw:?}: {e}"))?;
    }
    if let Some(lang) = cli.lang {
        resolved.locale = lang;
    }
    if let Some(secs) = cli.timeout {
        resolved.timeout = Some(Duration::from_secs(secs));
    }

    debug!(profile = %profile_name, source = %resolved.source, "resolved dashboard config");
    Ok(resolved)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal enters raw mode
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = resolve_config(&cli)?;
    info!(source = %config.source, locale = %config.locale, "starting hivemap-tui");

    let mut app = App::new(Dashboard::new(config));
    app.run().await?;

    Ok(())
}
