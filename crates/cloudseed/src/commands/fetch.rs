//! Fetch command: select a datasource and print normalized metadata.

use std::fmt::Write as _;

use cloudseed_datasource::{DatasourceRegistry, Metadata};

use crate::cli::{FetchArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    registry: &DatasourceRegistry,
    args: FetchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let source = registry.select().await.ok_or(CliError::NoDatasource)?;
    let metadata = source.fetch_metadata().await?;

    let out = output::render_single(&global.output, &metadata, detail, |m| m.hostname.clone());
    output::print_output(&out, global.quiet);

    if args.userdata {
        let userdata = source.fetch_userdata().await?;
        if !global.quiet {
            eprintln!("userdata: {} bytes", userdata.len());
        }
    }
    Ok(())
}

fn detail(metadata: &Metadata) -> String {
    let mut out = format!("Hostname:     {}\n", metadata.hostname);
    if let Some(public) = metadata.public_ipv4 {
        let _ = writeln!(out, "Public IPv4:  {public}");
    }
    if let Some(local) = metadata.local_ipv4 {
        let _ = writeln!(out, "Local IPv4:   {local}");
    }
    for (name, key) in &metadata.public_keys {
        let _ = writeln!(out, "SSH key [{name}]: {key}");
    }
    out.trim_end().to_owned()
}
