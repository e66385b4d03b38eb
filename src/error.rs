//! Error taxonomy for wallet, balance, quote and swap operations.
//!
//! Every variant is caught once at the tool dispatcher and rendered as the
//! text of an error response, so the `Display` output is what callers see.

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the trading tools.
#[derive(Debug, Error)]
pub enum TradeError {
    /// The supplied secret key could not be decoded into a keypair.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Token account resolution or balance lookup failed.
    #[error("Failed to get token balance: {0:#}")]
    BalanceQuery(anyhow::Error),

    /// The aggregator rejected the quote request or could not be reached.
    #[error("Failed to get swap quote: {0}")]
    QuoteUnavailable(String),

    /// The aggregator did not return an unsigned swap transaction.
    #[error("Failed to prepare swap transaction: {0}")]
    Preparation(String),

    /// The swap transaction payload could not be decoded or signed.
    #[error("Malformed swap transaction: {0}")]
    MalformedTransaction(String),

    /// The signed transaction was not accepted for submission.
    #[error("Failed to broadcast transaction: {0:#}")]
    Broadcast(anyhow::Error),

    /// The transaction landed but failed on-chain.
    #[error("Transaction {txid} failed: {reason}")]
    Execution { txid: String, reason: String },

    /// No terminal status was observed before the confirmation deadline.
    #[error("Transaction {txid} not confirmed after {}s{}", .waited.as_secs(), status_suffix(.last_error))]
    ConfirmationTimeout {
        txid: String,
        waited: Duration,
        last_error: Option<String>,
    },

    /// A tool was invoked with missing or malformed arguments.
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// No tool is registered under the requested name.
    #[error("Unknown tool: {0}")]
    UnknownCommand(String),
}

impl TradeError {
    /// Shorthand for building an [`TradeError::InvalidArguments`].
    pub fn invalid_arguments(tool: &str, reason: impl Into<String>) -> Self {
        TradeError::InvalidArguments {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }
}

fn status_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(" (last status error: {e})"),
        None => String::new(),
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TradeError>;
