//! Core data model for the wallet and swap tools.

use crate::error::{Result, TradeError};
use serde::{Deserialize, Serialize};

/// Upper bound for the slippage tolerance, in percent.
pub const MAX_SLIPPAGE_PERCENT: f64 = 100.0;

/// A transient wallet representation handed back to the caller.
///
/// Never stored: each call produces one and returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Base58 public key derived from `private_key`
    pub public_key: String,
    /// Base58 encoding of the 64-byte secret key
    pub private_key: String,
}

/// Parameters of a quote request sent to the swap aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteRequest {
    /// Mint of the token being sold
    pub input_mint: String,
    /// Mint of the token being bought
    pub output_mint: String,
    /// Amount of the input token, in its smallest unit
    pub amount: String,
    /// Slippage tolerance in basis points
    pub slippage_bps: u16,
}

impl SwapQuoteRequest {
    /// Build a request from a slippage percentage in `[0, 100]`.
    ///
    /// The percentage must convert to a whole number of basis points.
    pub fn new(
        input_mint: impl Into<String>,
        output_mint: impl Into<String>,
        amount: impl Into<String>,
        slippage_percent: f64,
    ) -> Result<Self> {
        let amount = amount.into();
        if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TradeError::invalid_arguments(
                "get_swap_quote",
                format!("amount must be an integer in the token's smallest unit, got {amount:?}"),
            ));
        }

        Ok(Self {
            input_mint: input_mint.into(),
            output_mint: output_mint.into(),
            amount,
            slippage_bps: slippage_to_bps(slippage_percent)?,
        })
    }
}

/// Convert a slippage percentage into basis points.
///
/// Rejects values outside `[0, 100]` and values with more than two decimal
/// places, so `0.5` is 50 bps while `0.555` is an error.
pub fn slippage_to_bps(slippage_percent: f64) -> Result<u16> {
    if !slippage_percent.is_finite() || !(0.0..=MAX_SLIPPAGE_PERCENT).contains(&slippage_percent) {
        return Err(TradeError::invalid_arguments(
            "get_swap_quote",
            format!("slippage must be between 0 and 100, got {slippage_percent}"),
        ));
    }

    let bps = slippage_percent * 100.0;
    let rounded = bps.round();
    // Float noise from the multiplication (0.07 * 100 = 7.000000000000001)
    if (bps - rounded).abs() > 1e-6 {
        return Err(TradeError::invalid_arguments(
            "get_swap_quote",
            format!("slippage {slippage_percent}% is not a whole number of basis points"),
        ));
    }

    Ok(rounded as u16)
}

/// An aggregator quote, passed through verbatim between quote and swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapQuote(pub serde_json::Value);

impl SwapQuote {
    /// Borrow the raw quote document.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Terminal status of a swap execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Confirmed,
    Failed,
}

/// Outcome of one swap execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
    /// Transaction signature, base58
    pub txid: String,
    pub status: SwapStatus,
}
