//! `ChainClient` backed by the nonblocking Solana RPC client.

use super::{ChainClient, SignatureState};
use anyhow::{Context, Result};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::{Transaction, VersionedTransaction};
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Solana RPC client wrapper.
pub struct RpcChainClient {
    rpc: Arc<RpcClient>,
}

impl RpcChainClient {
    /// Connect to `rpc_url` with a per-request timeout, confirming at `confirmed`.
    pub fn new(rpc_url: &str, timeout: Duration) -> Self {
        let rpc = RpcClient::new_with_timeout_and_commitment(
            rpc_url.to_string(),
            timeout,
            CommitmentConfig::confirmed(),
        );
        Self { rpc: Arc::new(rpc) }
    }

    pub fn url(&self) -> String {
        self.rpc.url()
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    #[instrument(skip(self), fields(address = %address))]
    async fn account_owner(&self, address: &Pubkey) -> Result<Option<Pubkey>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await
            .with_context(|| format!("Failed to fetch account {}", address))?;

        Ok(response.value.map(|account| account.owner))
    }

    #[instrument(skip(self, payer), fields(wallet = %wallet, mint = %mint))]
    async fn create_associated_token_account(
        &self,
        payer: &Keypair,
        wallet: &Pubkey,
        mint: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Signature> {
        let instruction =
            create_associated_token_account_idempotent(&payer.pubkey(), wallet, mint, token_program);

        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .context("Failed to fetch latest blockhash")?;

        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&payer.pubkey()),
            &[payer],
            blockhash,
        );

        let signature = self
            .rpc
            .send_and_confirm_transaction(&transaction)
            .await
            .context("Failed to create associated token account")?;

        info!("Created associated token account (tx {})", signature);
        Ok(signature)
    }

    #[instrument(skip(self), fields(token_account = %token_account))]
    async fn token_account_balance(&self, token_account: &Pubkey) -> Result<String> {
        let amount = self
            .rpc
            .get_token_account_balance(token_account)
            .await
            .with_context(|| format!("Failed to fetch balance of {}", token_account))?;

        debug!("Raw amount {} with {} decimals", amount.amount, amount.decimals);
        Ok(amount.ui_amount_string)
    }

    #[instrument(skip(self, transaction))]
    async fn send_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature> {
        // Preflight is skipped; failures surface during confirmation instead
        let config = RpcSendTransactionConfig {
            skip_preflight: true,
            ..RpcSendTransactionConfig::default()
        };

        self.rpc
            .send_transaction_with_config(transaction, config)
            .await
            .context("sendTransaction rejected")
    }

    #[instrument(skip(self), fields(signature = %signature))]
    async fn signature_state(&self, signature: &Signature) -> Result<SignatureState> {
        let statuses = self
            .rpc
            .get_signature_statuses(&[*signature])
            .await
            .context("getSignatureStatuses failed")?
            .value;

        let state = match statuses.into_iter().next().flatten() {
            None => SignatureState::Pending,
            Some(status) => match status.err {
                Some(err) => SignatureState::Failed(err.to_string()),
                None if status.satisfies_commitment(self.rpc.commitment()) => {
                    SignatureState::Confirmed
                }
                None => SignatureState::Pending,
            },
        };

        Ok(state)
    }
}
