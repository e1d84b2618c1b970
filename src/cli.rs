// src/cli.rs
//
// Command-line surface of the `site-audit` binary. Every flag can also be
// set through a SITE_AUDIT_* environment variable.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    FetchConfig, ServerConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(
    name = "site-audit",
    version,
    about = "Fetches a web page and scores it across SEO, performance, security, mobile, usability, technologies and social checks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one URL and print the report as JSON
    ///
    /// Example: site-audit analyze https://example.com --pretty
    Analyze {
        /// Page to analyze (http or https)
        url: String,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Serve the report API over HTTP
    Serve {
        #[arg(long, env = "SITE_AUDIT_HOST", default_value = DEFAULT_HOST)]
        host: String,

        #[arg(long, env = "SITE_AUDIT_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// JSON array of stored reports to preload (legacy records are migrated)
        #[arg(long, env = "SITE_AUDIT_SEED")]
        seed: Option<PathBuf>,

        #[command(flatten)]
        fetch: FetchArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Hard timeout for the page fetch, in seconds
    #[arg(long, env = "SITE_AUDIT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// User-Agent header sent with the page fetch
    #[arg(long, env = "SITE_AUDIT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl FetchArgs {
    pub fn to_config(&self) -> Result<FetchConfig, ConfigError> {
        FetchConfig::new(self.timeout_secs, self.user_agent.clone())
    }
}

pub fn server_config(
    host: &str,
    port: u16,
    seed: Option<PathBuf>,
    fetch: &FetchArgs,
) -> Result<ServerConfig, ConfigError> {
    ServerConfig::new(host, port, seed, fetch.to_config()?)
}

/// Installs the fmt subscriber on stderr so stdout stays pure JSON.
/// `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("site_audit=info,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .init();
}
