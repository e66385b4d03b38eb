//! Swap aggregator boundary: quote lookup and unsigned swap transactions.

pub mod jupiter;

use crate::error::Result;
use crate::types::{SwapQuote, SwapQuoteRequest};
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

pub use jupiter::JupiterClient;

/// An external service that prices swaps and builds their transactions.
#[async_trait]
pub trait SwapAggregator: Send + Sync {
    /// Fetch a quote; non-success responses map to `QuoteUnavailable`.
    async fn quote(&self, request: &SwapQuoteRequest) -> Result<SwapQuote>;

    /// Fetch the raw, unsigned transaction bytes executing `quote` for `user`.
    ///
    /// Failures map to `Preparation`, undecodable payloads to `MalformedTransaction`.
    async fn swap_transaction(&self, quote: &SwapQuote, user: &Pubkey) -> Result<Vec<u8>>;
}
