//! Runtime configuration for the trading tools.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Default Solana JSON-RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
/// Default Jupiter swap API base URL.
pub const DEFAULT_JUPITER_API_URL: &str = "https://quote-api.jup.ag/v6";

/// How the balance query treats a wallet that has no token account yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountResolution {
    /// Create the associated token account, paid by a throwaway keypair.
    #[default]
    CreateWithDisposableSigner,
    /// Report a zero balance without touching the chain.
    ReadOnly,
}

impl FromStr for AccountResolution {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" | "create-with-disposable-signer" => {
                Ok(AccountResolution::CreateWithDisposableSigner)
            }
            "read-only" | "readonly" => Ok(AccountResolution::ReadOnly),
            other => Err(anyhow!(
                "unknown account resolution '{}', expected 'create' or 'read-only'",
                other
            )),
        }
    }
}

/// Trader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Solana RPC endpoint
    pub rpc_url: String,
    /// Swap aggregator base URL
    pub jupiter_api_url: String,
    /// Optional aggregator API key, sent as `x-api-key`
    pub jupiter_api_key: Option<String>,
    /// Timeout applied to every HTTP and RPC call, in seconds
    pub request_timeout_seconds: u64,
    /// Delay between confirmation polls, in milliseconds
    pub confirm_poll_interval_ms: u64,
    /// Deadline for a broadcast transaction to reach a terminal status, in seconds
    pub confirm_timeout_seconds: u64,
    /// Missing token account policy for balance queries
    pub account_resolution: AccountResolution,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            jupiter_api_url: DEFAULT_JUPITER_API_URL.to_string(),
            jupiter_api_key: None,
            request_timeout_seconds: 30,
            confirm_poll_interval_ms: 500,
            // Roughly the lifetime of a recent blockhash
            confirm_timeout_seconds: 90,
            account_resolution: AccountResolution::default(),
        }
    }
}

impl TraderConfig {
    /// Build a configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("SOLANA_RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(url) = get("JUPITER_API_URL") {
            config.jupiter_api_url = url.trim_end_matches('/').to_string();
        }
        config.jupiter_api_key = get("JUPITER_API_KEY");

        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_seconds = parse_var("REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("CONFIRM_POLL_INTERVAL_MS") {
            config.confirm_poll_interval_ms = parse_var("CONFIRM_POLL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = get("CONFIRM_TIMEOUT_SECS") {
            config.confirm_timeout_seconds = parse_var("CONFIRM_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("BALANCE_ACCOUNT_RESOLUTION") {
            config.account_resolution = v
                .parse()
                .context("invalid BALANCE_ACCOUNT_RESOLUTION")?;
        }

        Ok(config)
    }

    /// Set the RPC endpoint.
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    /// Set the aggregator base URL.
    pub fn with_jupiter_api_url(mut self, url: impl Into<String>) -> Self {
        self.jupiter_api_url = url.into();
        self
    }

    /// Set the aggregator API key.
    pub fn with_jupiter_api_key(mut self, key: impl Into<String>) -> Self {
        self.jupiter_api_key = Some(key.into());
        self
    }

    /// Set the per-call network timeout in seconds.
    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    /// Set confirmation polling interval and deadline.
    pub fn with_confirmation(mut self, poll_interval_ms: u64, timeout_seconds: u64) -> Self {
        self.confirm_poll_interval_ms = poll_interval_ms;
        self.confirm_timeout_seconds = timeout_seconds;
        self
    }

    /// Set the missing token account policy.
    pub fn with_account_resolution(mut self, resolution: AccountResolution) -> Self {
        self.account_resolution = resolution;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn confirm_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_poll_interval_ms)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_seconds)
    }
}

fn parse_var(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a non-negative integer, got '{}'", key, value))
}
