//! Trader: wallet custody, balance lookups, quotes and swap execution.
//!
//! `SolanaTrader` owns the two network collaborators and is shared read-only
//! across tool invocations.

pub mod balance;
pub mod swap;

use crate::aggregator::{JupiterClient, SwapAggregator};
use crate::chain::{ChainClient, RpcChainClient};
use crate::config::{AccountResolution, TraderConfig};
use crate::error::Result;
use crate::types::{SwapQuote, SwapQuoteRequest, SwapResult, Wallet};
use crate::wallet;
use std::time::Duration;
use tracing::{info, instrument};

pub use swap::{SwapPipeline, SwapStage};

/// Facade over the wallet, balance, quote and swap operations.
pub struct SolanaTrader<A, C> {
    aggregator: A,
    chain: C,
    account_resolution: AccountResolution,
    confirm_poll_interval: Duration,
    confirm_timeout: Duration,
}

impl SolanaTrader<JupiterClient, RpcChainClient> {
    /// Build a trader talking to Jupiter and a Solana RPC node.
    pub fn from_config(config: &TraderConfig) -> anyhow::Result<Self> {
        let aggregator = JupiterClient::new(config)?;
        let chain = RpcChainClient::new(&config.rpc_url, config.request_timeout());
        info!(
            "Trader using RPC {} and aggregator {}",
            chain.url(),
            config.jupiter_api_url
        );
        Ok(Self::new(aggregator, chain, config))
    }
}

impl<A: SwapAggregator, C: ChainClient> SolanaTrader<A, C> {
    /// Build a trader from explicit collaborators.
    pub fn new(aggregator: A, chain: C, config: &TraderConfig) -> Self {
        Self {
            aggregator,
            chain,
            account_resolution: config.account_resolution,
            confirm_poll_interval: config.confirm_poll_interval(),
            confirm_timeout: config.confirm_timeout(),
        }
    }

    pub fn create_wallet(&self) -> Wallet {
        wallet::create_wallet()
    }

    pub fn import_wallet(&self, private_key: &str) -> Result<Wallet> {
        wallet::import_wallet(private_key)
    }

    /// Balance of `token_mint` held by `wallet_address`, as a decimal string.
    pub async fn get_token_balance(&self, wallet_address: &str, token_mint: &str) -> Result<String> {
        balance::get_token_balance(&self.chain, self.account_resolution, wallet_address, token_mint)
            .await
    }

    /// Fetch a quote for `request` from the aggregator.
    #[instrument(skip(self, request), fields(amount = %request.amount, slippage_bps = request.slippage_bps))]
    pub async fn get_swap_quote(&self, request: &SwapQuoteRequest) -> Result<SwapQuote> {
        self.aggregator.quote(request).await
    }

    /// Prepare, sign, broadcast and confirm the swap described by `quote`.
    pub async fn execute_swap(&self, quote: SwapQuote, wallet_private_key: &str) -> Result<SwapResult> {
        let keypair = wallet::keypair_from_base58(wallet_private_key)?;
        SwapPipeline::new(&self.aggregator, &self.chain, self.confirm_poll_interval, self.confirm_timeout)
            .run(quote, &keypair)
            .await
    }
}
