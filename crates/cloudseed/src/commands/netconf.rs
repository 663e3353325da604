//! Netconf command: run the synthesis engine and show the result.
//!
//! The summary view consumes the generators exactly the way a renderer
//! would -- through their rendered directives -- so what it prints is what
//! would land on disk.

use std::fs;

use serde::Serialize;
use tabled::Tabled;

use cloudseed_datasource::DatasourceRegistry;
use cloudseed_network::providers::digitalocean;
use cloudseed_network::{InterfaceGenerator, NetconfError};

use crate::cli::{GlobalOpts, NetconfArgs};
use crate::error::CliError;
use crate::output;

/// Pair a datasource with its provider parser.
///
/// Providers without a network concept synthesize nothing; that is a valid
/// outcome, not an error.
pub fn synthesize(
    source_type: &str,
    raw: &str,
) -> Result<Vec<Box<dyn InterfaceGenerator>>, NetconfError> {
    match source_type {
        "digitalocean" => digitalocean::process_netconf(raw),
        _ => Ok(Vec::new()),
    }
}

// ── Interface summary ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct InterfaceSummary {
    pub mac: String,
    pub unit: String,
    pub addresses: Vec<String>,
    pub routes: Vec<String>,
    pub nameservers: Vec<String>,
}

/// Summarize a generator from its rendered directives.
pub fn summarize(generator: &dyn InterfaceGenerator) -> InterfaceSummary {
    let mut addresses = Vec::new();
    let mut routes = Vec::new();
    let mut nameservers = Vec::new();
    let mut destination: Option<String> = None;

    for line in generator.config_file().lines() {
        if let Some(value) = line.strip_prefix("Address=") {
            addresses.push(value.to_owned());
        } else if let Some(value) = line.strip_prefix("DNS=") {
            nameservers.push(value.to_owned());
        } else if let Some(value) = line.strip_prefix("Destination=") {
            destination = Some(value.to_owned());
        } else if let Some(value) = line.strip_prefix("Gateway=") {
            let dest = destination.take().unwrap_or_default();
            routes.push(format!("{dest} via {value}"));
        }
    }

    InterfaceSummary {
        mac: generator.hwaddr().to_string(),
        unit: generator.unit_name(),
        addresses,
        routes,
        nameservers,
    }
}

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Addresses")]
    addresses: String,
    #[tabled(rename = "Routes")]
    routes: String,
    #[tabled(rename = "DNS")]
    nameservers: String,
}

impl From<&InterfaceSummary> for InterfaceRow {
    fn from(s: &InterfaceSummary) -> Self {
        Self {
            mac: s.mac.clone(),
            addresses: s.addresses.join(", "),
            routes: s.routes.join(", "),
            nameservers: s.nameservers.join(", "),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    registry: &DatasourceRegistry,
    args: NetconfArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (source_type, raw) = match &args.file {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| CliError::ReadFailed {
                path: path.display().to_string(),
                source,
            })?;
            ("digitalocean".to_owned(), raw)
        }
        None => {
            let source = registry.select().await.ok_or(CliError::NoDatasource)?;
            let raw = source.fetch_network_config().await?.unwrap_or_default();
            (source.source_type().to_owned(), raw)
        }
    };

    let generators = synthesize(&source_type, &raw)?;

    if generators.is_empty() {
        if !global.quiet {
            eprintln!("no network metadata; nothing to synthesize");
        }
        return Ok(());
    }

    if args.render {
        let mut rendered = String::new();
        for generator in &generators {
            rendered.push_str(&format!("# {}\n{}\n", generator.unit_name(), generator.config_file()));
        }
        output::print_output(rendered.trim_end(), global.quiet);
        return Ok(());
    }

    let summaries: Vec<InterfaceSummary> =
        generators.iter().map(|g| summarize(g.as_ref())).collect();
    let out = output::render_list(&global.output, &summaries, |s| InterfaceRow::from(s), |s| {
        s.mac.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
