//! Tool layer: request/response envelope, typed commands and the dispatcher.

pub mod dispatcher;
pub mod schema;

use crate::error::{Result, TradeError};
use crate::types::{SwapQuote, SwapQuoteRequest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use dispatcher::Dispatcher;
pub use schema::{tool_definitions, ToolDefinition, TOOLS};

/// A named tool invocation with its raw argument bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// One block of response content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// The uniform reply to every tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub content: Vec<ToolContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|ToolContent::Text { text }| text.as_str())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportWalletArgs {
    private_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBalanceArgs {
    wallet_address: String,
    token_mint: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapQuoteArgs {
    input_mint: String,
    output_mint: String,
    amount: String,
    slippage: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteSwapArgs {
    quote: Map<String, Value>,
    wallet_private_key: String,
}

/// A validated tool invocation, one variant per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateWallet,
    ImportWallet {
        private_key: String,
    },
    GetTokenBalance {
        wallet_address: String,
        token_mint: String,
    },
    GetSwapQuote(SwapQuoteRequest),
    ExecuteSwap {
        quote: SwapQuote,
        wallet_private_key: String,
    },
}

impl Command {
    /// Validate a raw request into a typed command.
    ///
    /// Arguments are checked against the tool's listed schema first. Fails with
    /// `UnknownCommand` or `InvalidArguments`; no handler runs on failure.
    pub fn parse(request: &ToolRequest) -> Result<Self> {
        let tool = schema::find_tool(&request.name)
            .ok_or_else(|| TradeError::UnknownCommand(request.name.clone()))?;

        let arguments = match &request.arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map.clone(),
            other => {
                return Err(TradeError::invalid_arguments(
                    tool.name,
                    format!("arguments must be an object, got {}", json_type(other)),
                ))
            }
        };
        // Presence and JSON types come from the registry; the structs below only extract
        tool.check_arguments(&arguments)?;
        let arguments = Value::Object(arguments);

        let command = match tool.name {
            schema::CREATE_WALLET => Command::CreateWallet,
            schema::IMPORT_WALLET => {
                let args: ImportWalletArgs = decode(tool.name, arguments)?;
                Command::ImportWallet {
                    private_key: non_empty(tool.name, "privateKey", args.private_key)?,
                }
            }
            schema::GET_TOKEN_BALANCE => {
                let args: TokenBalanceArgs = decode(tool.name, arguments)?;
                Command::GetTokenBalance {
                    wallet_address: non_empty(tool.name, "walletAddress", args.wallet_address)?,
                    token_mint: non_empty(tool.name, "tokenMint", args.token_mint)?,
                }
            }
            schema::GET_SWAP_QUOTE => {
                let args: SwapQuoteArgs = decode(tool.name, arguments)?;
                Command::GetSwapQuote(SwapQuoteRequest::new(
                    non_empty(tool.name, "inputMint", args.input_mint)?,
                    non_empty(tool.name, "outputMint", args.output_mint)?,
                    args.amount,
                    args.slippage,
                )?)
            }
            schema::EXECUTE_SWAP => {
                let args: ExecuteSwapArgs = decode(tool.name, arguments)?;
                Command::ExecuteSwap {
                    quote: SwapQuote(Value::Object(args.quote)),
                    wallet_private_key: non_empty(
                        tool.name,
                        "walletPrivateKey",
                        args.wallet_private_key,
                    )?,
                }
            }
            other => return Err(TradeError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateWallet => schema::CREATE_WALLET,
            Command::ImportWallet { .. } => schema::IMPORT_WALLET,
            Command::GetTokenBalance { .. } => schema::GET_TOKEN_BALANCE,
            Command::GetSwapQuote(_) => schema::GET_SWAP_QUOTE,
            Command::ExecuteSwap { .. } => schema::EXECUTE_SWAP,
        }
    }
}

fn decode<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| TradeError::invalid_arguments(tool, e.to_string()))
}

fn non_empty(tool: &str, field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        Err(TradeError::invalid_arguments(tool, format!("`{}` must not be empty", field)))
    } else {
        Ok(value)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
