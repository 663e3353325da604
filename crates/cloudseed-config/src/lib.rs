//! Configuration for the cloudseed provisioning agent.
//!
//! TOML file + `CLOUDSEED_*` environment overrides, layered with figment.
//! The config decides where rendered output lands, how long metadata
//! fetches may take, and which datasources are probed in what order --
//! everything else comes from the cloud itself.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level agent configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Directory rendered configuration is written into.
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,

    /// Name recorded for installed SSH keys.
    #[serde(default = "default_ssh_key_name")]
    pub ssh_key_name: String,

    /// Per-request metadata fetch timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub datasources: DatasourcesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            ssh_key_name: default_ssh_key_name(),
            timeout_secs: default_timeout(),
            datasources: DatasourcesConfig::default(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject configurations that cannot drive a run: unknown datasource
    /// names in the priority list, an empty workspace path, a zero
    /// timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workspace.as_os_str().is_empty() {
            return Err(ConfigError::Validation {
                field: "workspace".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        for name in &self.datasources.priority {
            if !KNOWN_DATASOURCES.contains(&name.as_str()) {
                return Err(ConfigError::Validation {
                    field: "datasources.priority".into(),
                    reason: format!(
                        "unknown datasource '{name}' (known: {})",
                        KNOWN_DATASOURCES.join(", ")
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Datasource names accepted in `datasources.priority`.
pub const KNOWN_DATASOURCES: [&str; 2] = ["digitalocean", "server-context"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasourcesConfig {
    /// Probe order; earlier entries win.
    #[serde(default = "default_priority")]
    pub priority: Vec<String>,

    #[serde(default)]
    pub digitalocean: DigitalOceanConfig,

    #[serde(default)]
    pub cloudsigma: CloudSigmaConfig,
}

impl Default for DatasourcesConfig {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            digitalocean: DigitalOceanConfig::default(),
            cloudsigma: CloudSigmaConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DigitalOceanConfig {
    /// Metadata service root.
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,
}

impl Default for DigitalOceanConfig {
    fn default() -> Self {
        Self {
            metadata_url: default_metadata_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudSigmaConfig {
    /// File the server context is read from.
    #[serde(default = "default_context_path")]
    pub context_path: PathBuf,

    /// DMI marker checked by the availability probe.
    #[serde(default = "default_product_name_path")]
    pub product_name_path: PathBuf,
}

impl Default for CloudSigmaConfig {
    fn default() -> Self {
        Self {
            context_path: default_context_path(),
            product_name_path: default_product_name_path(),
        }
    }
}

fn default_workspace() -> PathBuf {
    PathBuf::from("/var/lib/cloudseed")
}
fn default_ssh_key_name() -> String {
    "cloudseed".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_priority() -> Vec<String> {
    KNOWN_DATASOURCES.iter().map(ToString::to_string).collect()
}
fn default_metadata_url() -> String {
    "http://169.254.169.254/".into()
}
fn default_context_path() -> PathBuf {
    PathBuf::from("/var/run/cloudseed/server-context.json")
}
fn default_product_name_path() -> PathBuf {
    PathBuf::from("/sys/class/dmi/id/product_name")
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "cloudseed", "cloudseed").map_or_else(
        || PathBuf::from("/etc/cloudseed/config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load configuration from an explicit file (or the canonical path) plus
/// `CLOUDSEED_*` environment overrides, then validate it.
pub fn load_config(file: Option<&PathBuf>) -> Result<Config, ConfigError> {
    let path = file.cloned().unwrap_or_else(config_path);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("CLOUDSEED_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}
