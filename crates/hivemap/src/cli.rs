//! Clap derive structures for the `hivemap` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Compiled into `build.rs` as well, so only clap types may appear here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hivemap -- infrastructure facility map from the command line
#[derive(Debug, Parser)]
#[command(
    name = "hivemap",
    version,
    about = "Browse, filter and export infrastructure facilities",
    long_about = "Loads a fixture of infrastructure facilities (power plants, airports,\n\
        data centers, ...) from a local file or URL and lets you filter them,\n\
        inspect overlays, export CSV and peek at simulated control terminals.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "HIVEMAP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Fixture URL or file path (overrides profile)
    #[arg(long, short = 's', env = "HIVEMAP_SOURCE", global = true)]
    pub source: Option<String>,

    /// Display language for labels and messages
    #[arg(long, env = "HIVEMAP_LANG", global = true)]
    pub lang: Option<Language>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HIVEMAP_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Fetch timeout in seconds (no timeout by default)
    #[arg(long, env = "HIVEMAP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Language {
    /// English
    En,
    /// German
    De,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect facilities
    #[command(alias = "fac", alias = "f")]
    Facilities(FacilitiesArgs),

    /// Export every loaded facility as CSV
    Export(ExportArgs),

    /// Show critical facilities
    Alerts,

    /// Derived map overlays
    #[command(alias = "ov")]
    Overlays(OverlaysArgs),

    /// Snapshot a facility's simulated control terminal
    #[command(alias = "term")]
    Terminal(TerminalArgs),

    /// List facility categories and their labels
    Types,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FACILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FacilitiesArgs {
    #[command(subcommand)]
    pub command: FacilitiesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FacilitiesCommand {
    /// List facilities matching the given filters
    #[command(alias = "ls")]
    List(FilterArgs),

    /// Show one facility with its status history
    Get {
        /// Facility id (e.g. power-1)
        id: String,
    },
}

/// Filter flags. Repeat a flag to allow several values; different flags
/// must all match.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Facility type (power, airport, server, ...)
    #[arg(long = "type", short = 't')]
    pub types: Vec<String>,

    /// Facility status (active, critical, offline)
    #[arg(long = "status")]
    pub statuses: Vec<String>,

    /// Country code (DE, FR, ...)
    #[arg(long = "country", short = 'c')]
    pub countries: Vec<String>,

    /// Case-insensitive text search over name and description
    #[arg(long, short = 'S')]
    pub search: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EXPORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output file (default: facilities.csv)
    #[arg(long, short = 'f', conflicts_with = "stdout")]
    pub file: Option<PathBuf>,

    /// Write CSV to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OVERLAYS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OverlaysArgs {
    #[command(subcommand)]
    pub command: OverlaysCommand,
}

#[derive(Debug, Subcommand)]
pub enum OverlaysCommand {
    /// Heatmap points (critical facilities weigh more)
    Heatmap,

    /// Resolved connection lines between facilities
    Connections,

    /// Grid clusters of the facilities matching the filters
    Clusters {
        /// Cell size in degrees (overrides profile)
        #[arg(long)]
        cell: Option<f64>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Rail station layer
    Stations,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TERMINAL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TerminalArgs {
    /// Facility id
    pub id: String,

    /// Simulation steps to run before the snapshot
    #[arg(long, default_value = "0")]
    pub ticks: u32,

    /// Seed for reproducible readings
    #[arg(long)]
    pub seed: Option<u64>,

    /// Trigger the emergency shutdown before the snapshot
    #[arg(long)]
    pub emergency: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup (--yes writes defaults)
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
