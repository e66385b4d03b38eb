//! Command dispatcher: validates tool requests, runs them, and folds every
//! outcome into a `ToolResponse`.

use super::{Command, ToolDefinition, ToolRequest, ToolResponse};
use crate::aggregator::SwapAggregator;
use crate::chain::ChainClient;
use crate::error::Result;
use crate::trader::SolanaTrader;
use serde_json::json;
use tracing::{error, info, instrument};

/// Successful handler output before it is rendered as text.
#[derive(Debug)]
enum Output {
    /// Passed through unchanged
    Text(String),
    /// Rendered as indented JSON
    Json(serde_json::Value),
}

impl Output {
    fn render(self) -> String {
        match self {
            Output::Text(text) => text,
            Output::Json(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Routes tool requests to the trader.
pub struct Dispatcher<A, C> {
    trader: SolanaTrader<A, C>,
}

impl<A: SwapAggregator, C: ChainClient> Dispatcher<A, C> {
    pub fn new(trader: SolanaTrader<A, C>) -> Self {
        Self { trader }
    }

    /// Static listing of the available tools.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        super::tool_definitions()
    }

    /// Run one tool request. Never fails: errors become `isError` responses.
    #[instrument(skip(self, request), fields(tool = %request.name))]
    pub async fn dispatch(&self, request: ToolRequest) -> ToolResponse {
        match self.execute(&request).await {
            Ok(output) => {
                info!("Tool {} succeeded", request.name);
                ToolResponse::text(output.render())
            }
            Err(e) => {
                error!("Error in {}: {}", request.name, e);
                ToolResponse::error(e.to_string())
            }
        }
    }

    async fn execute(&self, request: &ToolRequest) -> Result<Output> {
        let command = Command::parse(request)?;

        match command {
            Command::CreateWallet => Ok(Output::Json(json!(self.trader.create_wallet()))),
            Command::ImportWallet { private_key } => {
                let wallet = self.trader.import_wallet(&private_key)?;
                Ok(Output::Json(json!(wallet)))
            }
            Command::GetTokenBalance {
                wallet_address,
                token_mint,
            } => {
                let balance = self
                    .trader
                    .get_token_balance(&wallet_address, &token_mint)
                    .await?;
                Ok(Output::Text(balance))
            }
            Command::GetSwapQuote(quote_request) => {
                let quote = self.trader.get_swap_quote(&quote_request).await?;
                Ok(Output::Json(json!(quote)))
            }
            Command::ExecuteSwap {
                quote,
                wallet_private_key,
            } => {
                let result = self.trader.execute_swap(quote, &wallet_private_key).await?;
                Ok(Output::Json(json!(result)))
            }
        }
    }
}
