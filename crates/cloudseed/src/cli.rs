//! Clap derive structures for the `cloudseed` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cloudseed -- boot-time provisioning agent for cloud instances
#[derive(Debug, Parser)]
#[command(
    name = "cloudseed",
    version,
    about = "Discover the cloud environment and synthesize host configuration",
    long_about = "A boot-time provisioning agent for cloud compute instances.\n\n\
        Probes the configured datasources in priority order, fetches instance\n\
        metadata, and synthesizes network configuration ready for a renderer\n\
        to apply. Never touches live network state itself.",
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
    /// Config file path (defaults to the platform config dir)
    #[arg(long, env = "CLOUDSEED_CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CLOUDSEED_OUTPUT",
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

    /// Metadata fetch timeout in seconds (overrides config)
    #[arg(long, env = "CLOUDSEED_TIMEOUT", global = true)]
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Probe each configured datasource's availability
    #[command(alias = "p")]
    Probe(ProbeArgs),

    /// Fetch and print normalized instance metadata
    #[command(alias = "f")]
    Fetch(FetchArgs),

    /// Synthesize network configuration from provider metadata
    #[command(alias = "net")]
    Netconf(NetconfArgs),

    /// Run the full pipeline and write rendered units into the workspace
    Apply(ApplyArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ProbeArgs {}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Also fetch and print raw userdata length
    #[arg(long)]
    pub userdata: bool,
}

#[derive(Debug, Args)]
pub struct NetconfArgs {
    /// Parse a local netconf document instead of the live datasource
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Dump the rendered unit text instead of the interface summary
    #[arg(long)]
    pub render: bool,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Print what would be written without touching the workspace
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
