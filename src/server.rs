//! MCP server over stdio: newline-delimited JSON-RPC 2.0.
//!
//! Requests are handled strictly one after another; each `tools/call` runs
//! to completion before the next line is read.

use crate::aggregator::SwapAggregator;
use crate::chain::ChainClient;
use crate::tools::{Dispatcher, ToolRequest};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";
/// Name reported in `initialize`.
pub const SERVER_NAME: &str = "solana-trading-server";

/// JSON-RPC error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// An incoming JSON-RPC message. Messages without `id` are notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// An outgoing JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

fn parse_error(e: impl std::fmt::Display) -> RpcResponse {
    RpcResponse::error(
        Value::Null,
        error_codes::PARSE_ERROR,
        format!("Parse error: {}", e),
    )
}

/// Stdio MCP server wrapping a tool dispatcher.
pub struct McpServer<A, C> {
    dispatcher: Dispatcher<A, C>,
}

impl<A: SwapAggregator, C: ChainClient> McpServer<A, C> {
    pub fn new(dispatcher: Dispatcher<A, C>) -> Self {
        Self { dispatcher }
    }

    /// Handle one line of input; `None` means nothing is written back.
    pub async fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Unparsable message: {}", e);
                return Some(parse_error(e));
            }
        };

        let request_id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: RpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            // Well-formed JSON that is not a request object
            Err(e) => {
                warn!("Malformed request: {}", e);
                return Some(RpcResponse::error(
                    request_id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid Request: {}", e),
                ));
            }
        };

        let id = match request.id.clone() {
            Some(id) => id,
            None => {
                debug!("Notification {}", request.method);
                return None;
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(RpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                "Only JSON-RPC 2.0 is supported",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => RpcResponse::success(id, self.initialize_result()),
            "ping" => RpcResponse::success(id, json!({})),
            "tools/list" => {
                RpcResponse::success(id, json!({ "tools": self.dispatcher.list_tools() }))
            }
            "tools/call" => self.call_tool(id, request.params).await,
            other => RpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };

        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    async fn call_tool(&self, id: Value, params: Option<Value>) -> RpcResponse {
        let request: ToolRequest = match params.map(serde_json::from_value::<ToolRequest>) {
            Some(Ok(request)) => request,
            Some(Err(e)) => {
                return RpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tools/call params: {}", e),
                )
            }
            None => {
                return RpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing 'params' object")
            }
        };

        let response = self.dispatcher.dispatch(request).await;
        match serde_json::to_value(&response) {
            Ok(result) => RpcResponse::success(id, result),
            Err(e) => RpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`.
    ///
    /// Only an I/O failure on either stream ends the loop early.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .context("Failed to read request")?;
            if read == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line).await,
                Err(e) => {
                    warn!("Request is not valid UTF-8: {}", e);
                    Some(parse_error(e))
                }
            };

            if let Some(response) = response {
                let mut encoded = serde_json::to_vec(&response)?;
                encoded.push(b'\n');
                writer
                    .write_all(&encoded)
                    .await
                    .context("Failed to write response")?;
                writer.flush().await?;
            }
        }

        info!("Input closed, stopping server");
        Ok(())
    }

    /// Serve on the process's stdin and stdout.
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }
}
