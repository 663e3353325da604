// ── Address, network, and route primitives ──
//
// Validating parsers over `std::net` plus the two value types the canonical
// model is built from. Provider documents carry addresses as loose text in
// family-specific fields, so every parser here takes the family the caller
// is reading -- the family is dictated by the JSON field, never inferred
// from the text.
//
// IPv4 netmasks are parsed address-shaped (any dotted quad is accepted,
// contiguous or not); IPv6 masks are built from an integer prefix length.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

use crate::error::NetconfError;

/// IP address family, dictated by which provider field is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Family {
    V4,
    V6,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => f.write_str("IPv4"),
            Self::V6 => f.write_str("IPv6"),
        }
    }
}

// ── Parsers ─────────────────────────────────────────────────────────

/// Parse `text` as an address of the requested family.
pub fn parse_address(text: &str, family: Family) -> Result<IpAddr, NetconfError> {
    match family {
        Family::V4 => parse_ipv4(text).map(IpAddr::V4),
        Family::V6 => parse_ipv6(text).map(IpAddr::V6),
    }
}

fn parse_ipv4(text: &str) -> Result<Ipv4Addr, NetconfError> {
    text.parse().map_err(|_| NetconfError::InvalidAddress {
        text: text.to_owned(),
        family: Family::V4,
    })
}

fn parse_ipv6(text: &str) -> Result<Ipv6Addr, NetconfError> {
    text.parse().map_err(|_| NetconfError::InvalidAddress {
        text: text.to_owned(),
        family: Family::V6,
    })
}

/// Parse a `dns.nameservers` entry. Resolvers may be either family.
pub fn parse_nameserver(text: &str) -> Result<IpAddr, NetconfError> {
    text.parse().map_err(|_| NetconfError::InvalidNameserver {
        text: text.to_owned(),
    })
}

/// Parse a gateway address of the requested family.
pub fn parse_gateway(text: &str, family: Family) -> Result<IpAddr, NetconfError> {
    parse_address(text, family).map_err(|_| NetconfError::InvalidGateway {
        text: text.to_owned(),
        family,
    })
}

/// Build the canonical IPv6 mask for a prefix length: the top `prefix` bits
/// set, so `/16` yields `ffff::`.
pub fn mask_from_prefix(prefix: u32) -> Result<Ipv6Addr, NetconfError> {
    if prefix > 128 {
        return Err(NetconfError::InvalidIpv6Prefix(prefix));
    }
    let bits = if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - prefix)
    };
    Ok(Ipv6Addr::from(bits))
}

/// Parse an IPv4 address block: dotted-quad address plus dotted-quad mask.
///
/// The address is parsed before the mask, so when both are malformed the
/// reported error names the address.
pub fn parse_ipv4_network(address: &str, netmask: &str) -> Result<Network, NetconfError> {
    let address = parse_ipv4(address)?;
    let netmask = netmask
        .parse::<Ipv4Addr>()
        .map_err(|_| NetconfError::InvalidIpv4Mask {
            text: netmask.to_owned(),
        })?;
    Ok(Network::v4(address, netmask))
}

/// Parse an IPv6 address block: colon-hex address plus integer prefix length.
///
/// Address errors take priority over prefix errors, mirroring the IPv4 form.
pub fn parse_ipv6_network(address: &str, prefix: u32) -> Result<Network, NetconfError> {
    let address = parse_ipv6(address)?;
    let netmask = mask_from_prefix(prefix)?;
    Ok(Network::v6(address, netmask))
}

// ── Network ─────────────────────────────────────────────────────────

/// An address/netmask pair describing a CIDR block.
///
/// The address and mask are guaranteed to be of the same family: the only
/// constructors are the family-typed `v4`/`v6` and `default_route`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Network {
    address: IpAddr,
    netmask: IpAddr,
}

impl Network {
    pub fn v4(address: Ipv4Addr, netmask: Ipv4Addr) -> Self {
        Self {
            address: IpAddr::V4(address),
            netmask: IpAddr::V4(netmask),
        }
    }

    pub fn v6(address: Ipv6Addr, netmask: Ipv6Addr) -> Self {
        Self {
            address: IpAddr::V6(address),
            netmask: IpAddr::V6(netmask),
        }
    }

    /// The all-zero network of a family: `0.0.0.0/0` or `::/0`.
    pub fn default_route(family: Family) -> Self {
        match family {
            Family::V4 => Self::v4(Ipv4Addr::UNSPECIFIED, Ipv4Addr::UNSPECIFIED),
            Family::V6 => Self::v6(Ipv6Addr::UNSPECIFIED, Ipv6Addr::UNSPECIFIED),
        }
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn netmask(&self) -> IpAddr {
        self.netmask
    }

    pub fn family(&self) -> Family {
        match self.address {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }

    /// The prefix length, when the mask is contiguous.
    pub fn prefix_len(&self) -> Option<u32> {
        match self.netmask {
            IpAddr::V4(mask) => {
                let bits = mask.to_bits();
                (bits.count_ones() == bits.leading_ones()).then_some(bits.count_ones())
            }
            IpAddr::V6(mask) => {
                let bits = mask.to_bits();
                (bits.count_ones() == bits.leading_ones()).then_some(bits.count_ones())
            }
        }
    }
}

impl fmt::Display for Network {
    /// `address/prefixlen` when the mask is contiguous, `address/mask` text
    /// otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix_len() {
            Some(len) => write!(f, "{}/{len}", self.address),
            None => write!(f, "{}/{}", self.address, self.netmask),
        }
    }
}

// ── Route ───────────────────────────────────────────────────────────

/// A route: traffic matching `destination` is sent via `gateway`.
///
/// Only synthesized on request -- a provider-declared gateway on its own
/// never becomes a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    destination: Network,
    gateway: IpAddr,
}

impl Route {
    /// The default route of a family, pointing at `gateway`.
    pub fn default_via(family: Family, gateway: IpAddr) -> Self {
        Self {
            destination: Network::default_route(family),
            gateway,
        }
    }

    pub fn destination(&self) -> Network {
        self.destination
    }

    pub fn gateway(&self) -> IpAddr {
        self.gateway
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn address_family_is_dictated_not_inferred() {
        assert!(parse_address("1.2.3.4", Family::V4).is_ok());
        assert_eq!(
            parse_address("1.2.3.4", Family::V6).unwrap_err().to_string(),
            "could not parse \"1.2.3.4\" as IPv6 address"
        );
        assert_eq!(
            parse_address("fe00::", Family::V4).unwrap_err().to_string(),
            "could not parse \"fe00::\" as IPv4 address"
        );
    }

    #[test]
    fn nameserver_accepts_both_families() {
        assert_eq!(
            parse_nameserver("1.2.3.4").unwrap(),
            IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4))
        );
        assert!(parse_nameserver("2001:4860:4860::8888").is_ok());
        assert_eq!(
            parse_nameserver("bad").unwrap_err().to_string(),
            "could not parse \"bad\" as nameserver IP address"
        );
    }

    #[test]
    fn gateway_errors_name_the_role() {
        assert_eq!(
            parse_gateway("bad", Family::V4).unwrap_err().to_string(),
            "could not parse \"bad\" as IPv4 gateway"
        );
        assert_eq!(
            parse_gateway("bad", Family::V6).unwrap_err().to_string(),
            "could not parse \"bad\" as IPv6 gateway"
        );
    }

    #[test]
    fn prefix_sixteen_yields_ffff_mask() {
        assert_eq!(mask_from_prefix(16).unwrap(), "ffff::".parse::<Ipv6Addr>().unwrap());
    }

    #[test]
    fn prefix_bounds() {
        assert_eq!(mask_from_prefix(0).unwrap(), Ipv6Addr::UNSPECIFIED);
        assert_eq!(
            mask_from_prefix(128).unwrap(),
            Ipv6Addr::from(u128::MAX)
        );
        assert_eq!(
            mask_from_prefix(129).unwrap_err().to_string(),
            "invalid IPv6 prefix length: 129"
        );
    }

    #[test]
    fn ipv4_network_accepts_any_dotted_quad_mask() {
        let network = parse_ipv4_network("1.2.3.4", "255.0.255.0").unwrap();
        assert_eq!(network.prefix_len(), None);
        assert_eq!(network.to_string(), "1.2.3.4/255.0.255.0");
    }

    #[test]
    fn ipv4_network_displays_contiguous_masks_as_prefix() {
        let network = parse_ipv4_network("1.2.3.4", "255.255.0.0").unwrap();
        assert_eq!(network.prefix_len(), Some(16));
        assert_eq!(network.to_string(), "1.2.3.4/16");
    }

    #[test]
    fn address_error_takes_priority_over_mask_error() {
        let err = parse_ipv4_network("bad", "bad").unwrap_err();
        assert_eq!(err.to_string(), "could not parse \"bad\" as IPv4 address");
    }

    #[test]
    fn ipv6_network_from_prefix() {
        let network = parse_ipv6_network("fe00::", 16).unwrap();
        assert_eq!(network.to_string(), "fe00::/16");
        assert_eq!(
            network.netmask(),
            IpAddr::V6("ffff::".parse::<Ipv6Addr>().unwrap())
        );
    }

    #[test]
    fn default_route_is_all_zeroes() {
        assert_eq!(Network::default_route(Family::V4).to_string(), "0.0.0.0/0");
        assert_eq!(Network::default_route(Family::V6).to_string(), "::/0");
    }

    #[test]
    fn default_via_pairs_zero_network_with_gateway() {
        let gateway = IpAddr::V4(Ipv4Addr::new(5, 6, 7, 8));
        let route = Route::default_via(Family::V4, gateway);
        assert_eq!(route.destination(), Network::default_route(Family::V4));
        assert_eq!(route.gateway(), gateway);
    }
}
