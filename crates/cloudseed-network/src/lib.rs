//! Network configuration synthesis engine.
//!
//! Takes provider-supplied, loosely-typed network description documents and
//! deterministically produces a canonical, renderable model of network
//! interfaces -- addresses, default routes, DNS resolvers -- with precise
//! validation and error reporting at every parsing step:
//!
//! - **Primitives** ([`network`], [`mac`]) -- validating parsers for
//!   addresses, netmasks, gateways, and hardware addresses. Nothing is held
//!   as raw text once accepted; the address family is always dictated by
//!   the field being read, never inferred.
//!
//! - **Canonical model** ([`interface`]) -- [`LogicalInterface`] binds a
//!   hardware address to a [`ConfigMethod`] addressing strategy;
//!   [`PhysicalInterface`] implements the [`InterfaceGenerator`] capability
//!   the rendering stage consumes.
//!
//! - **Provider parsers** ([`providers`]) -- one
//!   `process_netconf(raw) -> Vec<Box<dyn InterfaceGenerator>>` entry point
//!   per supported cloud, decoding into typed intermediate structures and
//!   mapping them into the canonical model. All-or-nothing: the first error
//!   aborts the whole call, because a half-applied network plan is unsafe
//!   to hand to a booting instance.
//!
//! The engine is synchronous and pure over its inputs: no I/O, no shared
//! state, no retries. Fetching metadata and applying rendered configuration
//! both live elsewhere.

pub mod error;
pub mod interface;
pub mod mac;
pub mod network;
pub mod providers;

pub use error::NetconfError;
pub use interface::{
    ConfigMethod, InterfaceGenerator, LogicalInterface, PhysicalInterface, StaticConfig,
};
pub use mac::MacAddr;
pub use network::{Family, Network, Route};
