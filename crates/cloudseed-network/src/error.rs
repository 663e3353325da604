use thiserror::Error;

use crate::network::Family;

/// Top-level error type for the network synthesis engine.
///
/// Every variant is terminal for the parse call that produced it: a half
/// parsed network plan is never returned. The messages are an operator-facing
/// contract -- boot failures on headless instances get debugged from these
/// strings alone, so each one names the offending raw text and the role it
/// played.
#[derive(Debug, Error)]
pub enum NetconfError {
    // ── Structural ──────────────────────────────────────────────────
    /// The raw document is not valid for the provider's expected shape.
    #[error("failed to decode network metadata: {0}")]
    Decode(#[from] serde_json::Error),

    // ── Addressing ──────────────────────────────────────────────────
    /// A `dns.nameservers` entry failed to parse as any IP address.
    #[error("could not parse {text:?} as nameserver IP address")]
    InvalidNameserver { text: String },

    /// An interface address failed family-specific parsing.
    #[error("could not parse {text:?} as {family} address")]
    InvalidAddress { text: String, family: Family },

    /// An IPv4 netmask was not dotted-quad shaped.
    #[error("could not parse {text:?} as IPv4 mask")]
    InvalidIpv4Mask { text: String },

    /// An IPv6 prefix length was outside 0..=128.
    #[error("invalid IPv6 prefix length: {0}")]
    InvalidIpv6Prefix(u32),

    /// A gateway address failed family-specific parsing.
    #[error("could not parse {text:?} as {family} gateway")]
    InvalidGateway { text: String, family: Family },

    // ── Hardware ────────────────────────────────────────────────────
    /// A hardware address was malformed.
    #[error("invalid MAC address: {text}")]
    InvalidMac { text: String },
}
