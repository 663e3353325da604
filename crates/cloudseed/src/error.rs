//! CLI error types with miette diagnostics.
//!
//! Maps library errors into user-facing errors with actionable help text
//! and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use cloudseed_config::ConfigError;
use cloudseed_datasource::DatasourceError;
use cloudseed_network::NetconfError;

/// Exit codes per the CLI contract.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NO_DATASOURCE: i32 = 4;
    pub const TRANSPORT: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(cloudseed::config),
        help("Check the config file syntax, or run with --config pointing at a known-good file.")
    )]
    Config(#[from] ConfigError),

    // ── Datasource selection ─────────────────────────────────────────

    #[error("No datasource available on this host")]
    #[diagnostic(
        code(cloudseed::no_datasource),
        help(
            "None of the configured datasources answered their availability probe.\n\
             Run: cloudseed probe -v to see each probe's result."
        )
    )]
    NoDatasource,

    // ── Fetch / transport ────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(cloudseed::datasource))]
    Datasource(#[from] DatasourceError),

    // ── Synthesis ────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(cloudseed::netconf),
        help("The provider's network metadata is malformed; the network plan was not applied.")
    )]
    Netconf(#[from] NetconfError),

    // ── Filesystem ───────────────────────────────────────────────────

    #[error("Failed to write {path}")]
    #[diagnostic(code(cloudseed::write_failed))]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}")]
    #[diagnostic(code(cloudseed::read_failed))]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// Map the error to its process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::USAGE,
            Self::NoDatasource => exit_code::NO_DATASOURCE,
            Self::Datasource(err) if err.is_transient() => exit_code::TRANSPORT,
            _ => exit_code::GENERAL,
        }
    }
}
