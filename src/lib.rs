//! Solana trade tools - wallet, balance, quote and swap operations exposed as
//! MCP tools.
//!
//! An orchestrating agent can create or import a keypair wallet, read token
//! balances, fetch swap quotes from an aggregator and execute signed swaps
//! without speaking Solana RPC or the aggregator's HTTP API itself.

pub mod aggregator;
pub mod chain;
pub mod config;
pub mod error;
pub mod server;
pub mod tools;
pub mod trader;
pub mod types;
pub mod wallet;

// Re-export main types for convenience
pub use config::{AccountResolution, TraderConfig};
pub use error::TradeError;
pub use tools::{Dispatcher, ToolRequest, ToolResponse};
pub use trader::SolanaTrader;
pub use types::{SwapQuote, SwapQuoteRequest, SwapResult, SwapStatus, Wallet};
