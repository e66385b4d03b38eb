//! Entry point for the Solana trading MCP server.
//!
//! Speaks JSON-RPC on stdin/stdout; all logging goes to stderr.

use anyhow::Result;
use solana_trade_tools::server::McpServer;
use solana_trade_tools::{Dispatcher, SolanaTrader, TraderConfig};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = TraderConfig::from_env()?;
    info!(
        "Balance account resolution: {:?}, confirmation timeout {}s",
        config.account_resolution, config.confirm_timeout_seconds
    );

    let trader = SolanaTrader::from_config(&config)?;
    let server = McpServer::new(Dispatcher::new(trader));

    info!("Solana Trading Server running on stdio");

    tokio::select! {
        result = server.serve_stdio() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }

    Ok(())
}
