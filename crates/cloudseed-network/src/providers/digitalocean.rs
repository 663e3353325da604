// DigitalOcean netconf parser
//
// Decodes the droplet metadata document's network description into the
// canonical interface model. The document separates DNS configuration from
// two ordered interface lists, public and private; list membership -- not
// anything inside the entry -- decides whether an interface is eligible for
// a synthesized default route.
//
// Propagation is all-or-nothing: the first bad nameserver or interface
// aborts the whole call, because a partially-configured network is worse
// than none on a booting instance. Absent optional data is never an error.

use std::net::IpAddr;

use serde::Deserialize;
use tracing::debug;

use crate::error::NetconfError;
use crate::interface::{
    ConfigMethod, InterfaceGenerator, LogicalInterface, PhysicalInterface, StaticConfig,
};
use crate::mac::MacAddr;
use crate::network::{Family, Route, parse_gateway, parse_ipv4_network, parse_ipv6_network, parse_nameserver};

// ── Wire structures ─────────────────────────────────────────────────
//
// Fields use `#[serde(default)]` liberally: the metadata service omits
// whole blocks rather than sending null, and tolerating absence here is
// what lets "no data" mean "no config" instead of a decode failure.

/// The network-relevant portion of the droplet metadata document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Netconf {
    #[serde(default)]
    pub dns: Dns,
    #[serde(default)]
    pub interfaces: Interfaces,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dns {
    #[serde(default)]
    pub nameservers: Vec<String>,
}

/// Two independent ordered interface lists. Public entries are eligible
/// for the synthesized default route; private entries never are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Interfaces {
    #[serde(default)]
    pub public: Vec<Interface>,
    #[serde(default)]
    pub private: Vec<Interface>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Interface {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub ipv4: Option<Ipv4Block>,
    #[serde(default)]
    pub ipv6: Option<Ipv6Block>,
}

/// `{ip_address, netmask, gateway}` -- every field is loose text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ipv4Block {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub netmask: String,
    #[serde(default)]
    pub gateway: String,
}

/// `{ip_address, cidr, gateway}` -- the mask arrives as a prefix length.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ipv6Block {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub cidr: u32,
    #[serde(default)]
    pub gateway: String,
}

// ── Pipeline entry point ────────────────────────────────────────────

/// Parse a raw DigitalOcean network description into an ordered list of
/// interface generators.
///
/// An empty document yields an empty list: absence of network metadata is
/// not an error, the host just keeps its existing configuration. Given
/// identical input the output is structurally identical -- order is the
/// provider's declaration order, public before private.
pub fn process_netconf(raw: &str) -> Result<Vec<Box<dyn InterfaceGenerator>>, NetconfError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let netconf: Netconf = serde_json::from_str(raw)?;
    let nameservers = parse_nameservers(&netconf.dns)?;
    let generators = parse_interfaces(&netconf.interfaces, &nameservers)?;
    debug!(interfaces = generators.len(), nameservers = nameservers.len(), "parsed droplet netconf");
    Ok(generators)
}

/// Parse every nameserver entry in declared order. The first unparsable
/// entry aborts the call -- no partial resolver list is ever returned.
fn parse_nameservers(dns: &Dns) -> Result<Vec<IpAddr>, NetconfError> {
    dns.nameservers.iter().map(|text| parse_nameserver(text)).collect()
}

/// Parse both interface lists into generators: public entries first (route
/// eligible), then private (never routed). The first bad entry aborts the
/// whole call.
fn parse_interfaces(
    interfaces: &Interfaces,
    nameservers: &[IpAddr],
) -> Result<Vec<Box<dyn InterfaceGenerator>>, NetconfError> {
    let mut generators: Vec<Box<dyn InterfaceGenerator>> =
        Vec::with_capacity(interfaces.public.len() + interfaces.private.len());
    for entry in &interfaces.public {
        let iface = parse_interface(entry, nameservers, true)?;
        generators.push(Box::new(PhysicalInterface(iface)));
    }
    for entry in &interfaces.private {
        let iface = parse_interface(entry, nameservers, false)?;
        generators.push(Box::new(PhysicalInterface(iface)));
    }
    Ok(generators)
}

/// Parse a single interface entry.
///
/// The MAC is validated before either address block is touched. A gateway
/// on a non-routing interface is ignored without ever being parsed.
fn parse_interface(
    entry: &Interface,
    nameservers: &[IpAddr],
    use_route: bool,
) -> Result<LogicalInterface, NetconfError> {
    let hwaddr: MacAddr = entry.mac.parse()?;

    let mut addresses = Vec::new();
    let mut routes = Vec::new();

    if let Some(block) = &entry.ipv4 {
        addresses.push(parse_ipv4_network(&block.ip_address, &block.netmask)?);
        if use_route && !block.gateway.is_empty() {
            let gateway = parse_gateway(&block.gateway, Family::V4)?;
            routes.push(Route::default_via(Family::V4, gateway));
        }
    }

    if let Some(block) = &entry.ipv6 {
        addresses.push(parse_ipv6_network(&block.ip_address, block.cidr)?);
        if use_route && !block.gateway.is_empty() {
            let gateway = parse_gateway(&block.gateway, Family::V6)?;
            routes.push(Route::default_via(Family::V6, gateway));
        }
    }

    Ok(LogicalInterface::new(
        hwaddr,
        ConfigMethod::Static(StaticConfig {
            addresses,
            nameservers: nameservers.to_vec(),
            routes,
        }),
    ))
}
