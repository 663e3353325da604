// ── Canonical interface model ──
//
// The provider-independent representation every netconf parser converges
// to: a hardware address plus one addressing strategy. Values are built
// once per parse pass and never mutated; the rendering stage consumes them
// through the `InterfaceGenerator` capability so new interface kinds
// (bonds, VLANs, bridges) can be added without touching consumers.

use std::fmt::Write as _;
use std::net::IpAddr;

use serde::Serialize;

use crate::mac::MacAddr;
use crate::network::{Network, Route};

/// Static addressing: the interface's bound address blocks, the shared
/// resolver list, and any synthesized routes.
///
/// All three sequences are always initialized -- consumers never see an
/// "unset" state, only an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaticConfig {
    pub addresses: Vec<Network>,
    pub nameservers: Vec<IpAddr>,
    pub routes: Vec<Route>,
}

/// How an interface's addresses, routes, and resolvers are established.
///
/// Static assignment is the only strategy provider metadata describes
/// today; DHCP and manual are the natural extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum ConfigMethod {
    Static(StaticConfig),
}

/// An addressing configuration bound to a hardware address.
///
/// The interface exclusively owns its config method; there is no sharing
/// between interfaces beyond the (copied) resolver list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalInterface {
    hwaddr: MacAddr,
    config: ConfigMethod,
}

impl LogicalInterface {
    pub fn new(hwaddr: MacAddr, config: ConfigMethod) -> Self {
        Self { hwaddr, config }
    }

    pub fn hwaddr(&self) -> MacAddr {
        self.hwaddr
    }

    pub fn config(&self) -> &ConfigMethod {
        &self.config
    }
}

/// A logical interface bound to a physical NIC, as opposed to a future
/// bonded or VLAN interface that would reference other interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhysicalInterface(pub LogicalInterface);

/// The capability every parsed interface exposes to the rendering stage:
/// report the hardware address it targets and render its configuration
/// directives. Concrete on-disk syntax stays a renderer concern.
pub trait InterfaceGenerator: Send + Sync + std::fmt::Debug {
    /// The hardware address this configuration targets.
    fn hwaddr(&self) -> MacAddr;

    /// File name for the rendered unit, derived from the hardware address.
    fn unit_name(&self) -> String;

    /// Render the interface's configuration directives.
    fn config_file(&self) -> String;
}

impl InterfaceGenerator for PhysicalInterface {
    fn hwaddr(&self) -> MacAddr {
        self.0.hwaddr()
    }

    fn unit_name(&self) -> String {
        format!("00-{}.network", self.hwaddr().to_string().replace(':', "-"))
    }

    fn config_file(&self) -> String {
        let mut out = format!("[Match]\nMACAddress={}\n", self.hwaddr());

        let ConfigMethod::Static(config) = self.0.config();
        out.push_str("\n[Network]\n");
        for nameserver in &config.nameservers {
            let _ = writeln!(out, "DNS={nameserver}");
        }
        for address in &config.addresses {
            let _ = writeln!(out, "Address={address}");
        }
        for route in &config.routes {
            let _ = write!(
                out,
                "\n[Route]\nDestination={}\nGateway={}\n",
                route.destination(),
                route.gateway()
            );
        }
        out
    }
}
