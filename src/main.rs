use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use site_audit::api::analyze;
use site_audit::cli::{init_logging, server_config, Cli, Commands};
use site_audit::providers::HttpFetcher;
use site_audit::server::run_server;
use site_audit::store::MemoryStore;

/// Exit codes: 0 report printed, 1 the URL could not be analyzed, 2 anything else.
#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { url, pretty, fetch } => {
            let fetcher = HttpFetcher::new(fetch.to_config()?).context("failed to build HTTP client")?;

            let report = match analyze(&url, &fetcher).await {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("Error ({}): {}", e.kind(), e);
                    return Ok(1);
                }
            };

            let json = if pretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            }
            .context("failed to serialize report")?;
            println!("{}", json);
            Ok(0)
        }

        Commands::Serve { host, port, seed, fetch } => {
            let config = server_config(&host, port, seed, &fetch)?;
            let fetcher = HttpFetcher::new(config.fetch.clone()).context("failed to build HTTP client")?;

            let store = match &config.seed {
                Some(path) => {
                    let json = tokio::fs::read_to_string(path)
                        .await
                        .with_context(|| format!("failed to read seed file {}", path.display()))?;
                    MemoryStore::seed_from_json(&json)
                        .with_context(|| format!("failed to load seed file {}", path.display()))?
                }
                None => MemoryStore::new(),
            };

            run_server(config, Arc::new(fetcher), Arc::new(store))
                .await
                .context("server failed")?;
            Ok(0)
        }
    }
}
