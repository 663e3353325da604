//! Apply command: full pipeline, writing rendered units into the workspace.
//!
//! Writes files only -- handing them to the init system is a separate
//! concern. Missing network metadata is success: the host keeps whatever
//! configuration it already has.

use std::fs;

use owo_colors::OwoColorize as _;
use tracing::info;

use cloudseed_config::Config;
use cloudseed_datasource::DatasourceRegistry;

use crate::cli::{ApplyArgs, GlobalOpts};
use crate::commands::netconf;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    registry: &DatasourceRegistry,
    config: &Config,
    args: ApplyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let source = registry.select().await.ok_or(CliError::NoDatasource)?;
    info!(source = source.source_type(), "datasource selected");

    let raw = source
        .fetch_network_config()
        .await?
        .filter(|raw| !raw.is_empty());
    let Some(raw) = raw else {
        if !global.quiet {
            eprintln!("no network metadata available; leaving existing configuration untouched");
        }
        return Ok(());
    };

    let generators = netconf::synthesize(source.source_type(), &raw)?;
    if generators.is_empty() {
        if !global.quiet {
            eprintln!("no interfaces declared; leaving existing configuration untouched");
        }
        return Ok(());
    }

    let color = output::should_color(&global.color);
    let dir = config.workspace.join("network");
    if !args.dry_run {
        fs::create_dir_all(&dir).map_err(|source| CliError::WriteFailed {
            path: dir.display().to_string(),
            source,
        })?;
    }

    for generator in &generators {
        let path = dir.join(generator.unit_name());
        let contents = generator.config_file();
        if args.dry_run {
            if !global.quiet {
                println!("would write {} ({} bytes)", path.display(), contents.len());
            }
            continue;
        }
        fs::write(&path, &contents).map_err(|source| CliError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "wrote network unit");
        if !global.quiet {
            let mark = if color { "✓".green().to_string() } else { "✓".to_string() };
            println!("{mark} {}", path.display());
        }
    }
    Ok(())
}
