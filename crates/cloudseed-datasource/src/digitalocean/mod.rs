//! DigitalOcean droplet metadata datasource.
//!
//! Talks to the link-local metadata service. The network description the
//! synthesis engine consumes is part of the same `metadata/v1.json`
//! document, so `fetch_network_config` returns the raw document text and
//! `fetch_metadata` returns the normalized form.

mod client;
mod models;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

pub use client::MetadataClient;
pub use models::{DropletAddress, DropletInterface, DropletInterfaces, DropletMetadata};

use crate::datasource::Datasource;
use crate::error::DatasourceError;
use crate::metadata::{Metadata, parse_ip};

const METADATA_PATH: &str = "metadata/v1.json";
const USERDATA_PATH: &str = "metadata/v1/user-data";

pub struct DigitalOceanDatasource {
    client: MetadataClient,
    config_root: String,
}

impl DigitalOceanDatasource {
    /// Create a datasource against `metadata_url` (normally
    /// `http://169.254.169.254/`).
    pub fn new(metadata_url: &str, timeout: Duration) -> Result<Self, DatasourceError> {
        let base_url: Url = metadata_url.parse()?;
        let client = MetadataClient::new(base_url, timeout)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: MetadataClient) -> Self {
        let config_root = client.base_url().to_string();
        Self { client, config_root }
    }
}

#[async_trait]
impl Datasource for DigitalOceanDatasource {
    fn source_type(&self) -> &'static str {
        "digitalocean"
    }

    fn config_root(&self) -> &str {
        &self.config_root
    }

    async fn is_available(&self) -> bool {
        self.client.probe(METADATA_PATH).await
    }

    fn availability_changes(&self) -> bool {
        false
    }

    async fn fetch_metadata(&self) -> Result<Metadata, DatasourceError> {
        let document: DropletMetadata = self.client.get_json(METADATA_PATH).await?;
        debug!(droplet_id = ?document.droplet_id, region = ?document.region, "fetched droplet metadata");
        Ok(normalize(&document))
    }

    async fn fetch_userdata(&self) -> Result<Vec<u8>, DatasourceError> {
        let body = self.client.get_text(USERDATA_PATH).await?;
        Ok(body.map(String::into_bytes).unwrap_or_default())
    }

    async fn fetch_network_config(&self) -> Result<Option<String>, DatasourceError> {
        self.client.get_text(METADATA_PATH).await
    }
}

/// Map the droplet document into the canonical metadata shape.
///
/// Keys are indexed by declaration order; the convenience addresses come
/// from the first public and first private interface carrying an IPv4
/// block. Unparseable addresses are dropped, not fatal.
fn normalize(document: &DropletMetadata) -> Metadata {
    let public_keys: BTreeMap<String, String> = document
        .public_keys
        .iter()
        .enumerate()
        .map(|(index, key)| (index.to_string(), key.clone()))
        .collect();

    let first_ipv4 = |entries: &[DropletInterface]| {
        entries
            .iter()
            .filter_map(|iface| iface.ipv4.as_ref())
            .find_map(|addr| parse_ip(&addr.ip_address))
    };

    Metadata {
        hostname: document.hostname.clone(),
        public_keys,
        local_ipv4: first_ipv4(&document.interfaces.private),
        public_ipv4: first_ipv4(&document.interfaces.public),
    }
}
