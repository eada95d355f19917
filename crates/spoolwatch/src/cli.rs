//! Clap derive structures for the `spoolwatch` CLI.
//!
//! Only depends on clap + clap_complete so `build.rs` can include it for
//! man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// spoolwatch -- filament inventory monitor for Spoolman and Klipper
#[derive(Debug, Parser)]
#[command(
    name = "spoolwatch",
    version,
    about = "Monitor Spoolman filament levels and the spool loaded in a Klipper printer",
    long_about = "Queries a Spoolman server for spool inventory and, optionally, a\n\
        Moonraker instance for the active spool and firmware API version.\n\n\
        Spools are classified against info/warning/critical remaining-percentage\n\
        thresholds.",
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
    /// Config file to use instead of the platform default
    #[arg(long, env = "SPOOLWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Spoolman URL (overrides config)
    #[arg(long, short = 's', env = "SPOOLWATCH_SPOOLMAN_URL", global = true)]
    pub spoolman_url: Option<String>,

    /// Moonraker URL for active spool and version queries (overrides config)
    #[arg(long, env = "SPOOLWATCH_KLIPPER_URL", global = true)]
    pub klipper_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SPOOLWATCH_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SPOOLWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "SPOOLWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Minimum notification level for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelFilter {
    Info,
    Warning,
    Critical,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the Spoolman endpoint (connectivity, response format, health)
    Check,

    /// Show the printer's active spool and firmware API version
    #[command(alias = "st")]
    Status,

    /// List spools with remaining filament and notification level
    #[command(alias = "ls")]
    Spools(SpoolsArgs),

    /// Poll continuously and print each result until interrupted
    Watch(WatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Spools ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SpoolsArgs {
    /// Include archived spools (overrides config)
    #[arg(long, short = 'a')]
    pub archived: bool,

    /// Only show spools at or above this notification level
    #[arg(long, value_enum)]
    pub level: Option<LevelFilter>,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Minutes between polls, at most one week (overrides config)
    #[arg(long, short = 'i', value_parser = clap::value_parser!(u64).range(1..=10_080))]
    pub interval: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Display the effective configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
