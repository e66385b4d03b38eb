//! Blockchain boundary: the RPC calls the balance query and swap pipeline make.
//!
//! The trait keeps the pipeline independent of a live cluster; `RpcChainClient`
//! is the production implementation.

pub mod rpc;

use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::VersionedTransaction;

pub use rpc::RpcChainClient;

/// Status of a submitted transaction as reported by the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureState {
    /// Unknown to the cluster or below the required commitment
    Pending,
    /// Landed without error at the required commitment
    Confirmed,
    /// Landed with an execution error
    Failed(String),
}

/// Network operations used by the trader.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Owner program of an account, or `None` when the account does not exist.
    async fn account_owner(&self, address: &Pubkey) -> Result<Option<Pubkey>>;

    /// Create the associated token account for `(wallet, mint)`, paid by `payer`.
    async fn create_associated_token_account(
        &self,
        payer: &Keypair,
        wallet: &Pubkey,
        mint: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Signature>;

    /// Human-readable balance of a token account.
    async fn token_account_balance(&self, token_account: &Pubkey) -> Result<String>;

    /// Submit a signed transaction without preflight simulation.
    async fn send_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature>;

    /// Current status of a previously submitted transaction.
    async fn signature_state(&self, signature: &Signature) -> Result<SignatureState>;
}
