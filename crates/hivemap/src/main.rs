mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::io::IsTerminal;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use hivemap_core::Dashboard;

use crate::cli::{Cli, Command, GlobalOpts, OutputFormat};
use crate::error::CliError;

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
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't load any facilities
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Types => commands::types::handle(&cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "hivemap", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let dashboard_config = config::resolve(&cli.global)?;
            let dashboard = Dashboard::new(dashboard_config);
            load_with_spinner(&dashboard, &cli.global).await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &dashboard, &cli.global).await
        }
    }
}

/// Run the one startup load, showing a spinner on interactive stderr.
async fn load_with_spinner(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let interactive = !global.quiet
        && matches!(global.output, OutputFormat::Table)
        && std::io::stderr().is_terminal();

    let spinner = interactive.then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(dashboard.locale().loading());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    });

    let result = dashboard.load().await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let report = result?;
    if report.rejected > 0 && !global.quiet {
        eprintln!(
            "warning: skipped {} malformed record(s), loaded {}",
            report.rejected, report.accepted
        );
    }
    Ok(())
}
