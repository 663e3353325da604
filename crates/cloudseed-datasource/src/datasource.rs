// ── The datasource capability ──
//
// One implementation per supported cloud, tried in a fixed priority order
// by the registry. Probing must be side-effect free: "not this provider"
// is `false`, never an error.

use async_trait::async_trait;

use crate::error::DatasourceError;
use crate::metadata::Metadata;

/// A provider of instance metadata, userdata, and network configuration.
#[async_trait]
pub trait Datasource: Send + Sync {
    /// Stable identifier for logs and configuration (`"digitalocean"`,
    /// `"server-context"`).
    fn source_type(&self) -> &'static str;

    /// Root of this provider's configuration namespace (base URL or bus
    /// path); informational.
    fn config_root(&self) -> &str;

    /// Whether this provider's environment markers are present. Must not
    /// error for the "not this provider" case.
    async fn is_available(&self) -> bool;

    /// Whether availability may flip after boot (e.g. a context bus that
    /// attaches late), so the orchestrator should re-probe rather than
    /// cache a negative result.
    fn availability_changes(&self) -> bool;

    /// Fetch and normalize instance metadata.
    async fn fetch_metadata(&self) -> Result<Metadata, DatasourceError>;

    /// Fetch raw userdata. Absent userdata is an empty buffer, not an
    /// error.
    async fn fetch_userdata(&self) -> Result<Vec<u8>, DatasourceError>;

    /// Fetch the provider's raw network description for the synthesis
    /// engine.
    ///
    /// `Ok(None)` means "no network metadata available" -- a valid outcome
    /// (the host keeps its existing configuration), distinct from a
    /// transport failure.
    async fn fetch_network_config(&self) -> Result<Option<String>, DatasourceError>;
}
