//! Provider-specific netconf parsers.
//!
//! One module per supported cloud. Each decodes the provider's raw network
//! description into a strongly-typed intermediate structure, then maps it
//! deterministically into the canonical interface model. Untyped JSON never
//! crosses the decode boundary.

pub mod digitalocean;
