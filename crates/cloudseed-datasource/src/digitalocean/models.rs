// Droplet metadata document models
//
// Structures for the `metadata/v1.json` document. Fields use
// `#[serde(default)]` liberally because the service omits whole blocks
// rather than sending null. Only the fields normalization needs are
// modeled; the network description block is consumed verbatim by the
// synthesis engine and deliberately not re-modeled here.

use serde::Deserialize;

/// The droplet metadata document, as served at `metadata/v1.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DropletMetadata {
    #[serde(default)]
    pub droplet_id: Option<u64>,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub region: Option<String>,
    /// Full authorized-key lines, in declaration order.
    #[serde(default)]
    pub public_keys: Vec<String>,
    #[serde(default)]
    pub interfaces: DropletInterfaces,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DropletInterfaces {
    #[serde(default)]
    pub public: Vec<DropletInterface>,
    #[serde(default)]
    pub private: Vec<DropletInterface>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DropletInterface {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub ipv4: Option<DropletAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DropletAddress {
    #[serde(default)]
    pub ip_address: String,
}
