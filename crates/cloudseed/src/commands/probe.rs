//! Probe command: evaluate each registered datasource's availability.

use serde::Serialize;
use tabled::Tabled;

use cloudseed_datasource::DatasourceRegistry;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct ProbeResult {
    datasource: String,
    available: bool,
    availability_changes: bool,
    config_root: String,
}

#[derive(Tabled)]
struct ProbeRow {
    #[tabled(rename = "Datasource")]
    datasource: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Config Root")]
    config_root: String,
}

impl From<&ProbeResult> for ProbeRow {
    fn from(r: &ProbeResult) -> Self {
        Self {
            datasource: r.datasource.clone(),
            available: if r.available { "yes".into() } else { "no".into() },
            config_root: r.config_root.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(registry: &DatasourceRegistry, global: &GlobalOpts) -> Result<(), CliError> {
    let mut results = Vec::with_capacity(registry.sources().len());
    for source in registry.sources() {
        results.push(ProbeResult {
            datasource: source.source_type().to_owned(),
            available: source.is_available().await,
            availability_changes: source.availability_changes(),
            config_root: source.config_root().to_owned(),
        });
    }

    let out = output::render_list(
        &global.output,
        &results,
        |r| ProbeRow::from(r),
        |r| r.datasource.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
