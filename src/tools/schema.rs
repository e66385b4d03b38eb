//! Static registry of the exposed tools.
//!
//! Drives both the `tools/list` listing and the unknown-tool check in the
//! dispatcher.

use crate::error::{Result, TradeError};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
    Object,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Object => "object",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Object => value.is_object(),
        }
    }
}

/// One parameter of a tool. Every parameter is required.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub description: &'static str,
}

/// Name, description and parameters of a tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

const fn param(name: &'static str, kind: ParamType, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        description,
    }
}

pub const CREATE_WALLET: &str = "create_wallet";
pub const IMPORT_WALLET: &str = "import_wallet";
pub const GET_TOKEN_BALANCE: &str = "get_token_balance";
pub const GET_SWAP_QUOTE: &str = "get_swap_quote";
pub const EXECUTE_SWAP: &str = "execute_swap";

/// Every tool the server exposes.
pub static TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: CREATE_WALLET,
        description: "Create a new Solana wallet",
        params: &[],
    },
    ToolSpec {
        name: IMPORT_WALLET,
        description: "Import an existing Solana wallet using private key",
        params: &[param(
            "privateKey",
            ParamType::String,
            "Base58 encoded private key",
        )],
    },
    ToolSpec {
        name: GET_TOKEN_BALANCE,
        description: "Get token balance for a wallet",
        params: &[
            param("walletAddress", ParamType::String, "Solana wallet address"),
            param("tokenMint", ParamType::String, "Token mint address"),
        ],
    },
    ToolSpec {
        name: GET_SWAP_QUOTE,
        description: "Get a quote for swapping tokens",
        params: &[
            param("inputMint", ParamType::String, "Input token mint address"),
            param("outputMint", ParamType::String, "Output token mint address"),
            param(
                "amount",
                ParamType::String,
                "Amount of input tokens (in smallest units)",
            ),
            param("slippage", ParamType::Number, "Slippage tolerance (0-100)"),
        ],
    },
    ToolSpec {
        name: EXECUTE_SWAP,
        description: "Execute a token swap",
        params: &[
            param("quote", ParamType::Object, "Quote object from get_swap_quote"),
            param(
                "walletPrivateKey",
                ParamType::String,
                "Base58 encoded private key of the wallet",
            ),
        ],
    },
];

/// Look up a tool by name.
pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|tool| tool.name == name)
}

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

impl ToolSpec {
    /// JSON schema of this tool's arguments.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in self.params {
            properties.insert(
                param.name.to_string(),
                json!({ "type": param.kind.as_str(), "description": param.description }),
            );
        }
        let required: Vec<&str> = self.params.iter().map(|param| param.name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check that every declared parameter is present with its declared type.
    pub fn check_arguments(&self, arguments: &Map<String, Value>) -> Result<()> {
        for param in self.params {
            match arguments.get(param.name) {
                None | Some(Value::Null) => {
                    return Err(TradeError::invalid_arguments(
                        self.name,
                        format!("missing required argument `{}`", param.name),
                    ))
                }
                Some(value) if !param.kind.matches(value) => {
                    return Err(TradeError::invalid_arguments(
                        self.name,
                        format!("`{}` must be of type {}", param.name, param.kind.as_str()),
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name,
            description: self.description,
            input_schema: self.input_schema(),
        }
    }
}

/// Definitions of all tools, in registry order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    TOOLS.iter().map(ToolSpec::definition).collect()
}
