//! Swap execution pipeline.
//!
//! One execution walks `Preparing -> Signing -> Broadcasting -> Confirming`
//! and ends in `Confirmed` or `Failed`. Nothing is retried: a quote is only
//! good for a short window, so a failed stage ends the execution.

use crate::aggregator::SwapAggregator;
use crate::chain::{ChainClient, SignatureState};
use crate::error::{Result, TradeError};
use crate::types::{SwapQuote, SwapResult, SwapStatus};
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::VersionedTransaction;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

/// A state of one swap execution.
#[derive(Debug)]
pub enum SwapStage {
    /// Requesting the unsigned transaction for a quote
    Preparing { quote: SwapQuote },
    /// Decoding and signing the aggregator's payload
    Signing { unsigned: Vec<u8> },
    /// Submitting the signed transaction
    Broadcasting { transaction: VersionedTransaction },
    /// Polling until the cluster reports a terminal status
    Confirming { signature: Signature },
    Confirmed { signature: Signature },
    Failed(TradeError),
}

impl SwapStage {
    pub fn name(&self) -> &'static str {
        match self {
            SwapStage::Preparing { .. } => "preparing",
            SwapStage::Signing { .. } => "signing",
            SwapStage::Broadcasting { .. } => "broadcasting",
            SwapStage::Confirming { .. } => "confirming",
            SwapStage::Confirmed { .. } => "confirmed",
            SwapStage::Failed(_) => "failed",
        }
    }
}

/// Drives a single swap execution against borrowed collaborators.
pub struct SwapPipeline<'a, A: ?Sized, C: ?Sized> {
    aggregator: &'a A,
    chain: &'a C,
    poll_interval: Duration,
    confirm_timeout: Duration,
}

impl<'a, A, C> SwapPipeline<'a, A, C>
where
    A: SwapAggregator + ?Sized,
    C: ChainClient + ?Sized,
{
    pub fn new(aggregator: &'a A, chain: &'a C, poll_interval: Duration, confirm_timeout: Duration) -> Self {
        Self {
            aggregator,
            chain,
            poll_interval,
            confirm_timeout,
        }
    }

    /// Execute `quote` on behalf of `signer`.
    ///
    /// Only the signer's public key leaves the process.
    pub async fn run(&self, quote: SwapQuote, signer: &Keypair) -> Result<SwapResult> {
        let mut stage = SwapStage::Preparing { quote };

        loop {
            debug!(stage = stage.name(), "Swap pipeline step");
            stage = match stage {
                SwapStage::Preparing { quote } => {
                    match self.aggregator.swap_transaction(&quote, &signer.pubkey()).await {
                        Ok(unsigned) => SwapStage::Signing { unsigned },
                        Err(e) => SwapStage::Failed(e),
                    }
                }
                SwapStage::Signing { unsigned } => match sign_transaction(&unsigned, signer) {
                    Ok(transaction) => SwapStage::Broadcasting { transaction },
                    Err(e) => SwapStage::Failed(e),
                },
                SwapStage::Broadcasting { transaction } => {
                    match self.chain.send_transaction(&transaction).await {
                        Ok(signature) => {
                            info!("Swap transaction submitted: {}", signature);
                            SwapStage::Confirming { signature }
                        }
                        Err(e) => SwapStage::Failed(TradeError::Broadcast(e)),
                    }
                }
                SwapStage::Confirming { signature } => match self.await_confirmation(&signature).await {
                    Ok(()) => SwapStage::Confirmed { signature },
                    Err(e) => SwapStage::Failed(e),
                },
                SwapStage::Confirmed { signature } => {
                    info!("Swap confirmed: {}", signature);
                    return Ok(SwapResult {
                        txid: signature.to_string(),
                        status: SwapStatus::Confirmed,
                    });
                }
                SwapStage::Failed(e) => {
                    warn!("Swap failed: {}", e);
                    return Err(e);
                }
            };
        }
    }

    async fn await_confirmation(&self, signature: &Signature) -> Result<()> {
        let started = Instant::now();
        let mut last_error = None;

        loop {
            // A single poll never runs past the overall deadline
            let remaining = self.confirm_timeout.saturating_sub(started.elapsed());
            match timeout(remaining, self.chain.signature_state(signature)).await {
                Ok(Ok(SignatureState::Confirmed)) => return Ok(()),
                Ok(Ok(SignatureState::Failed(reason))) => {
                    return Err(TradeError::Execution {
                        txid: signature.to_string(),
                        reason,
                    })
                }
                Ok(Ok(SignatureState::Pending)) => {}
                Ok(Err(e)) => {
                    warn!("Status poll for {} failed: {:#}", signature, e);
                    last_error = Some(format!("{:#}", e));
                }
                Err(_) => {
                    warn!("Status poll for {} hit the confirmation deadline", signature);
                    last_error = Some("status poll did not answer before the deadline".to_string());
                }
            }

            let waited = started.elapsed();
            if waited >= self.confirm_timeout {
                return Err(TradeError::ConfirmationTimeout {
                    txid: signature.to_string(),
                    waited,
                    last_error,
                });
            }
            sleep(self.poll_interval.min(self.confirm_timeout - waited)).await;
        }
    }
}

/// Decode a wire-format transaction and sign it with `signer`.
///
/// Accepts legacy and versioned messages.
pub fn sign_transaction(bytes: &[u8], signer: &Keypair) -> Result<VersionedTransaction> {
    let unsigned: VersionedTransaction = bincode::deserialize(bytes)
        .map_err(|e| TradeError::MalformedTransaction(format!("cannot decode transaction: {}", e)))?;

    VersionedTransaction::try_new(unsigned.message, &[signer]).map_err(|e| {
        TradeError::MalformedTransaction(format!(
            "cannot sign as {}: {}",
            signer.pubkey(),
            e
        ))
    })
}
