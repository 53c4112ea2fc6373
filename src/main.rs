//! insights-gateway
//!
//! Hosts the function handlers behind one axum server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                 INSIGHTS GATEWAY                 │
//!   Client Request   │  ┌──────────┐   ┌──────────┐   ┌──────────────┐  │
//!  ──────────────────┼─▶│ request  │──▶│  router  │──▶│   identity   │  │
//!                    │  │ id/trace │   │ (prefix) │   │     gate     │  │
//!                    │  └──────────┘   └──────────┘   └──────┬───────┘  │
//!                    │                                       ▼          │
//!                    │        ┌────────────┬────────────┬──────────┐    │
//!                    │        │  greeting  │  insights  │  pages   │    │
//!                    │        │            │   proxy ───┼──────────┼────┼──▶ Upstream (mTLS)
//!                    │        └────────────┴────────────┴──────────┘    │
//!                    │        ┌────────────┐                            │
//!                    │        │   upload   │───▶ upload directory       │
//!                    │        └────────────┘                            │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use insights_gateway::config::{load_config, GatewayConfig};
use insights_gateway::lifecycle::startup;
use insights_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "insights-gateway")]
#[command(about = "Identity-gated insights proxy and audio upload service", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "insights-gateway starting"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
