//! CloudSigma server-context datasource.
//!
//! CloudSigma exposes the "server context" over a local guest bus rather
//! than an HTTP service. The transport is abstracted behind
//! [`ServerContextClient`] so the datasource logic stays testable; a
//! file-backed client is provided for hosts that surface the context as a
//! file dump.
//!
//! This provider has no network description on the bus yet:
//! `fetch_network_config` returns `Ok(None)`, which downstream treats as
//! "leave existing configuration untouched".

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use tracing::debug;

use crate::datasource::Datasource;
use crate::error::DatasourceError;
use crate::metadata::{Metadata, parse_ip};

const USERDATA_FIELD: &str = "cloudinit-user-data";

/// Default DMI marker checked by the availability probe.
pub const DEFAULT_PRODUCT_NAME_PATH: &str = "/sys/class/dmi/id/product_name";

// ── Transport ───────────────────────────────────────────────────────

/// Access to the server-context bus.
///
/// The real transport is a guest-side serial channel; anything that can
/// produce the raw context document and the `meta` key/value map works.
pub trait ServerContextClient: Send + Sync {
    /// The full server-context document.
    fn fetch_raw(&self) -> Result<Vec<u8>, DatasourceError>;

    /// The `meta` key/value map from the context.
    fn meta(&self) -> Result<HashMap<String, String>, DatasourceError>;
}

/// A [`ServerContextClient`] reading the context from a file on disk.
pub struct FileContextClient {
    path: PathBuf,
}

impl FileContextClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ServerContextClient for FileContextClient {
    fn fetch_raw(&self) -> Result<Vec<u8>, DatasourceError> {
        Ok(fs::read(&self.path)?)
    }

    fn meta(&self) -> Result<HashMap<String, String>, DatasourceError> {
        let raw = self.fetch_raw()?;
        let context: ServerContext = serde_json::from_slice(&raw)?;
        Ok(context.meta)
    }
}

// ── Context document ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
struct ServerContext {
    #[serde(default)]
    name: String,
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    meta: HashMap<String, String>,
    #[serde(default)]
    nics: Vec<Nic>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Nic {
    #[serde(default)]
    runtime: Option<NicRuntime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct NicRuntime {
    #[serde(default)]
    interface_type: String,
    /// The runtime block nests the address under `ip_v4.uuid`.
    #[serde(default, rename = "ip_v4")]
    ipv4: Option<NicAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct NicAddress {
    #[serde(default, rename = "uuid")]
    ip: String,
}

// ── Datasource ──────────────────────────────────────────────────────

pub struct ServerContextDatasource {
    client: Box<dyn ServerContextClient>,
    product_name_path: PathBuf,
}

impl ServerContextDatasource {
    pub fn new(client: Box<dyn ServerContextClient>) -> Self {
        Self {
            client,
            product_name_path: PathBuf::from(DEFAULT_PRODUCT_NAME_PATH),
        }
    }

    /// Override the DMI product-name path used by the availability probe.
    pub fn with_product_name_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.product_name_path = path.into();
        self
    }
}

#[async_trait]
impl Datasource for ServerContextDatasource {
    fn source_type(&self) -> &'static str {
        "server-context"
    }

    fn config_root(&self) -> &str {
        ""
    }

    async fn is_available(&self) -> bool {
        // DMI exposes the hypervisor vendor; any read failure means "not
        // this provider", never an error.
        match fs::read_to_string(&self.product_name_path) {
            Ok(product_name) => product_name.trim_end().starts_with("CloudSigma"),
            Err(_) => false,
        }
    }

    fn availability_changes(&self) -> bool {
        true
    }

    async fn fetch_metadata(&self) -> Result<Metadata, DatasourceError> {
        let raw = self.client.fetch_raw()?;
        let context: ServerContext = serde_json::from_slice(&raw)?;
        debug!(uuid = %context.uuid, nics = context.nics.len(), "fetched server context");
        Ok(normalize(&context))
    }

    async fn fetch_userdata(&self) -> Result<Vec<u8>, DatasourceError> {
        let meta = self.client.meta()?;
        let Some(userdata) = meta.get(USERDATA_FIELD) else {
            return Ok(Vec::new());
        };
        if is_base64_field(USERDATA_FIELD, &meta) {
            // A corrupt base64 payload yields empty userdata, not an error.
            return Ok(base64::engine::general_purpose::STANDARD
                .decode(userdata)
                .unwrap_or_default());
        }
        Ok(userdata.clone().into_bytes())
    }

    async fn fetch_network_config(&self) -> Result<Option<String>, DatasourceError> {
        Ok(None)
    }
}

/// Map the server context into the canonical metadata shape.
///
/// The hostname falls back to the server UUID when no name is set. The
/// `ssh_public_key` meta entry is keyed by its trailing token (the key
/// comment slot). NIC runtime addresses are split public/local by the
/// declared interface type.
fn normalize(context: &ServerContext) -> Metadata {
    let hostname = if context.name.is_empty() {
        context.uuid.clone()
    } else {
        context.name.clone()
    };

    let mut public_keys = BTreeMap::new();
    if let Some(key) = context.meta.get("ssh_public_key") {
        let label = key.split(' ').next_back().unwrap_or_default();
        public_keys.insert(label.to_owned(), key.clone());
    }

    let mut local_ipv4 = None;
    let mut public_ipv4 = None;
    for nic in &context.nics {
        let Some(runtime) = &nic.runtime else { continue };
        let Some(address) = runtime.ipv4.as_ref().and_then(|a| parse_ip(&a.ip)) else {
            continue;
        };
        if runtime.interface_type == "public" {
            public_ipv4 = Some(address);
        } else {
            local_ipv4 = Some(address);
        }
    }

    Metadata {
        hostname,
        public_keys,
        local_ipv4,
        public_ipv4,
    }
}

/// Whether `field` is listed in the context's comma-separated
/// `base64_fields` meta entry.
fn is_base64_field(field: &str, meta: &HashMap<String, String>) -> bool {
    meta.get("base64_fields")
        .is_some_and(|fields| fields.split(',').any(|entry| entry == field))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct StaticClient {
        raw: &'static str,
    }

    impl ServerContextClient for StaticClient {
        fn fetch_raw(&self) -> Result<Vec<u8>, DatasourceError> {
            Ok(self.raw.as_bytes().to_vec())
        }

        fn meta(&self) -> Result<HashMap<String, String>, DatasourceError> {
            let context: ServerContext = serde_json::from_slice(&self.fetch_raw()?)?;
            Ok(context.meta)
        }
    }

    fn datasource(raw: &'static str) -> ServerContextDatasource {
        ServerContextDatasource::new(Box::new(StaticClient { raw }))
    }

    const CONTEXT: &str = r#"{
        "name": "test-server",
        "uuid": "20a0059b-041e-4d0c-bcc6-9b2852de48b3",
        "meta": {
            "ssh_public_key": "ssh-rsa AAAAB3NzaC1 cloud@sigma",
            "base64_fields": "cloudinit-user-data",
            "cloudinit-user-data": "I2Nsb3VkLWNvbmZpZw=="
        },
        "nics": [
            {"runtime": {"interface_type": "public", "ip_v4": {"uuid": "185.12.6.183"}}},
            {"runtime": {"interface_type": "private", "ip_v4": {"uuid": "10.1.2.3"}}}
        ]
    }"#;

    #[tokio::test]
    async fn metadata_is_normalized() {
        let metadata = datasource(CONTEXT).fetch_metadata().await.unwrap();
        assert_eq!(metadata.hostname, "test-server");
        assert_eq!(
            metadata.public_keys.get("cloud@sigma").unwrap(),
            "ssh-rsa AAAAB3NzaC1 cloud@sigma"
        );
        assert_eq!(metadata.public_ipv4, Some("185.12.6.183".parse().unwrap()));
        assert_eq!(metadata.local_ipv4, Some("10.1.2.3".parse().unwrap()));
    }

    #[tokio::test]
    async fn hostname_falls_back_to_uuid() {
        let metadata = datasource(r#"{"uuid": "abc-123"}"#).fetch_metadata().await.unwrap();
        assert_eq!(metadata.hostname, "abc-123");
    }

    #[tokio::test]
    async fn userdata_is_base64_decoded_when_flagged() {
        let userdata = datasource(CONTEXT).fetch_userdata().await.unwrap();
        assert_eq!(userdata, b"#cloud-config");
    }

    #[tokio::test]
    async fn userdata_passes_through_when_not_flagged() {
        let raw = r##"{"meta": {"cloudinit-user-data": "#!/bin/sh"}}"##;
        let userdata = datasource(raw).fetch_userdata().await.unwrap();
        assert_eq!(userdata, b"#!/bin/sh");
    }

    #[tokio::test]
    async fn corrupt_base64_userdata_yields_empty() {
        let raw = r#"{"meta": {
            "base64_fields": "cloudinit-user-data",
            "cloudinit-user-data": "!!! not base64 !!!"
        }}"#;
        let userdata = datasource(raw).fetch_userdata().await.unwrap();
        assert_eq!(userdata, Vec::<u8>::new());
    }

    #[tokio::test]
    async fn missing_userdata_yields_empty() {
        let userdata = datasource("{}").fetch_userdata().await.unwrap();
        assert_eq!(userdata, Vec::<u8>::new());
    }

    #[tokio::test]
    async fn network_config_is_absent_not_an_error() {
        let netconf = datasource(CONTEXT).fetch_network_config().await.unwrap();
        assert_eq!(netconf, None);
    }

    #[tokio::test]
    async fn availability_probe_checks_dmi_marker() {
        use std::io::Write as _;

        let mut marker = tempfile::NamedTempFile::new().unwrap();
        writeln!(marker, "CloudSigma").unwrap();
        let available = datasource(CONTEXT)
            .with_product_name_path(marker.path())
            .is_available()
            .await;
        assert!(available);

        let mut other = tempfile::NamedTempFile::new().unwrap();
        writeln!(other, "KVM").unwrap();
        let available = datasource(CONTEXT)
            .with_product_name_path(other.path())
            .is_available()
            .await;
        assert!(!available);

        let available = datasource(CONTEXT)
            .with_product_name_path("/nonexistent/product_name")
            .is_available()
            .await;
        assert!(!available);
    }
}
