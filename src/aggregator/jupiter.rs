//! Jupiter swap API client.
//!
//! `GET {base}/quote` returns the quote document that is later posted
//! unchanged to `POST {base}/swap`, which answers with a base64 transaction.

use super::SwapAggregator;
use crate::config::TraderConfig;
use crate::error::{Result, TradeError};
use crate::types::{SwapQuote, SwapQuoteRequest};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, instrument, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SwapRequestBody<'a> {
    quote_response: &'a SwapQuote,
    user_public_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapResponseBody {
    swap_transaction: String,
}

/// HTTP client for the Jupiter quote/swap API.
#[derive(Debug, Clone)]
pub struct JupiterClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl JupiterClient {
    /// Create a client with the configured base URL, key and timeout.
    pub fn new(config: &TraderConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::with_client(
            http,
            &config.jupiter_api_url,
            config.jupiter_api_key.clone(),
        ))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(http: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }
}

#[async_trait]
impl SwapAggregator for JupiterClient {
    #[instrument(skip(self), fields(input = %request.input_mint, output = %request.output_mint))]
    async fn quote(&self, request: &SwapQuoteRequest) -> Result<SwapQuote> {
        let slippage_bps = request.slippage_bps.to_string();
        let http_request = self.http.get(format!("{}/quote", self.base_url)).query(&[
            ("inputMint", request.input_mint.as_str()),
            ("outputMint", request.output_mint.as_str()),
            ("amount", request.amount.as_str()),
            ("slippageBps", slippage_bps.as_str()),
        ]);

        let response = self
            .authorize(http_request)
            .send()
            .await
            .map_err(|e| TradeError::QuoteUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Quote request rejected with {}", status);
            return Err(TradeError::QuoteUnavailable(format!(
                "aggregator responded with {}",
                status
            )));
        }

        let quote = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TradeError::QuoteUnavailable(format!("unreadable quote body: {}", e)))?;

        debug!("Received quote");
        Ok(SwapQuote(quote))
    }

    #[instrument(skip(self, quote), fields(user = %user))]
    async fn swap_transaction(&self, quote: &SwapQuote, user: &Pubkey) -> Result<Vec<u8>> {
        let body = SwapRequestBody {
            quote_response: quote,
            user_public_key: user.to_string(),
        };

        let response = self
            .authorize(self.http.post(format!("{}/swap", self.base_url)).json(&body))
            .send()
            .await
            .map_err(|e| TradeError::Preparation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Swap preparation rejected with {}", status);
            return Err(TradeError::Preparation(format!(
                "aggregator responded with {}",
                status
            )));
        }

        let payload = response
            .json::<SwapResponseBody>()
            .await
            .map_err(|e| TradeError::Preparation(format!("missing swapTransaction: {}", e)))?;

        BASE64
            .decode(payload.swap_transaction.trim())
            .map_err(|e| TradeError::MalformedTransaction(format!("invalid base64: {}", e)))
    }
}
