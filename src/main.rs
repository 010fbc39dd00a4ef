//! # Awful News Agent
//!
//! Collects short news items from Usenet groups and web pages and renders
//! them as plain text, a static HTML page, or JSON.
//!
//! ## Usage
//!
//! ```sh
//! news_agent run --config agent.yaml
//! news_agent group nntp.aioe.org comp.lang.python.announce
//! ```
//!
//! ## Architecture
//!
//! One run is one distribution cycle:
//! 1. **Wiring**: build sources and destinations from the YAML config (or defaults)
//! 2. **Fetching**: drain every source in order into one collection
//! 3. **Rendering**: hand the full collection to every destination in order
//!
//! Logs go to stderr so the plain renderer owns stdout.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod charset;
mod cli;
mod config;
mod distributor;
mod error;
mod models;
mod nntp;
mod outputs;
mod sources;
mod utils;

use cli::{Cli, Command};
use config::AgentConfig;
use distributor::{Distributor, FailurePolicy};
use outputs::PlainRenderer;
use sources::NntpGroupSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.command, "Parsed CLI arguments");

    let distributor = match args.command {
        Command::DefaultConfig => {
            print!("{}", AgentConfig::default().to_yaml()?);
            return Ok(());
        }
        Command::Run { config, keep_going } => {
            let agent_config = match &config {
                Some(path) => AgentConfig::load(path).await?,
                None => {
                    info!("No config file given; using default wiring");
                    AgentConfig::default()
                }
            };
            let policy = if keep_going {
                FailurePolicy::SkipFailedSources
            } else {
                FailurePolicy::Abort
            };
            agent_config.build_distributor(policy)?
        }
        Command::Group {
            server,
            group,
            count,
        } => {
            let mut distributor = Distributor::new();
            distributor.add_source(NntpGroupSource::new(server, group, count));
            distributor.add_destination(PlainRenderer::new());
            distributor
        }
    };

    match distributor.distribute().await {
        Ok(count) => {
            let elapsed = start_time.elapsed();
            info!(count, ?elapsed, "Execution complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Distribution failed");
            Err(e.into())
        }
    }
}
