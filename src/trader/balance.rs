//! Token balance lookup through the wallet's associated token account.

use crate::chain::ChainClient;
use crate::config::AccountResolution;
use crate::error::{Result, TradeError};
use anyhow::{anyhow, Context};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use std::str::FromStr;
use tracing::{debug, instrument, warn};

/// Balance reported for accounts that hold nothing.
pub const ZERO_BALANCE: &str = "0";

/// Resolve the associated token account of `(wallet_address, token_mint)` and
/// return its balance.
///
/// With [`AccountResolution::CreateWithDisposableSigner`] a missing account is
/// created, paid by a freshly generated keypair rather than the wallet's own.
#[instrument(skip(chain))]
pub async fn get_token_balance<C: ChainClient + ?Sized>(
    chain: &C,
    resolution: AccountResolution,
    wallet_address: &str,
    token_mint: &str,
) -> Result<String> {
    lookup_balance(chain, resolution, wallet_address, token_mint)
        .await
        .map_err(TradeError::BalanceQuery)
}

async fn lookup_balance<C: ChainClient + ?Sized>(
    chain: &C,
    resolution: AccountResolution,
    wallet_address: &str,
    token_mint: &str,
) -> anyhow::Result<String> {
    let wallet = Pubkey::from_str(wallet_address)
        .with_context(|| format!("invalid wallet address '{}'", wallet_address))?;
    let mint = Pubkey::from_str(token_mint)
        .with_context(|| format!("invalid token mint '{}'", token_mint))?;

    // The mint's owner tells us whether this is an SPL Token or Token-2022 mint
    let token_program = chain
        .account_owner(&mint)
        .await?
        .ok_or_else(|| anyhow!("mint {} does not exist", mint))?;

    let token_account = get_associated_token_address_with_program_id(&wallet, &mint, &token_program);
    debug!("Resolved token account {}", token_account);

    if chain.account_owner(&token_account).await?.is_none() {
        match resolution {
            AccountResolution::ReadOnly => {
                debug!("No token account for {} yet; reporting zero", wallet);
            }
            AccountResolution::CreateWithDisposableSigner => {
                let payer = Keypair::new();
                warn!(
                    "Creating token account {} during a balance query, payer {}",
                    token_account,
                    payer.pubkey()
                );
                chain
                    .create_associated_token_account(&payer, &wallet, &mint, &token_program)
                    .await?;
            }
        }
        return Ok(ZERO_BALANCE.to_string());
    }

    let balance = chain.token_account_balance(&token_account).await?;
    if balance.is_empty() {
        Ok(ZERO_BALANCE.to_string())
    } else {
        Ok(balance)
    }
}
