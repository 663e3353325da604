mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cloudseed_config::Config;
use cloudseed_datasource::{
    DatasourceRegistry, DigitalOceanDatasource, FileContextClient, ServerContextDatasource,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "cloudseed", &mut std::io::stdout());
            Ok(())
        }

        // All other commands run against the configured datasources
        cmd => {
            let config = load_config(&cli.global)?;
            let registry = build_registry(&config)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &registry, &config, &cli.global).await
        }
    }
}

/// Load configuration, applying CLI flag overrides.
fn load_config(global: &cli::GlobalOpts) -> Result<Config, CliError> {
    let mut config = cloudseed_config::load_config(global.config.as_ref())?;
    if let Some(timeout) = global.timeout {
        config.timeout_secs = timeout;
        config.validate().map_err(CliError::Config)?;
    }
    Ok(config)
}

/// Build the datasource registry from the configured priority order.
fn build_registry(config: &Config) -> Result<DatasourceRegistry, CliError> {
    let mut registry = DatasourceRegistry::new();
    for name in &config.datasources.priority {
        match name.as_str() {
            "digitalocean" => {
                let source = DigitalOceanDatasource::new(
                    &config.datasources.digitalocean.metadata_url,
                    config.timeout(),
                )
                .map_err(CliError::Datasource)?;
                registry.register(Box::new(source));
            }
            "server-context" => {
                let client = FileContextClient::new(&config.datasources.cloudsigma.context_path);
                let source = ServerContextDatasource::new(Box::new(client))
                    .with_product_name_path(&config.datasources.cloudsigma.product_name_path);
                registry.register(Box::new(source));
            }
            // Unknown names are rejected by Config::validate before this point.
            _ => {}
        }
    }
    Ok(registry)
}
