// ── Canonical normalized metadata ──
//
// Every datasource converges to this shape regardless of what its provider
// document looks like. Field names follow the established metadata
// vocabulary (`local-ipv4`, `public-ipv4`); `BTreeMap` keeps serialization
// deterministic so identical inputs always produce identical bytes.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Provider-independent instance metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub hostname: String,

    /// SSH public keys, keyed by the provider's identifier for the key
    /// (fingerprint, comment token, or declaration index).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub public_keys: BTreeMap<String, String>,

    #[serde(rename = "local-ipv4", default, skip_serializing_if = "Option::is_none")]
    pub local_ipv4: Option<IpAddr>,

    #[serde(rename = "public-ipv4", default, skip_serializing_if = "Option::is_none")]
    pub public_ipv4: Option<IpAddr>,
}

/// Parse an optional address string, silently dropping unparseable values.
///
/// Normalization is a best-effort field mapping: a provider sending a
/// malformed convenience address must not sink the whole metadata fetch.
pub(crate) fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.parse().ok()
}
