//! Shared in-memory collaborators for integration tests.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::message::{v0, VersionedMessage};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::VersionedTransaction;
use solana_trade_tools::aggregator::SwapAggregator;
use solana_trade_tools::chain::{ChainClient, SignatureState};
use solana_trade_tools::error::TradeError;
use solana_trade_tools::{Dispatcher, SolanaTrader, SwapQuote, SwapQuoteRequest, TraderConfig};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Wire bytes of an unsigned v0 transaction paid by `payer`.
pub fn unsigned_transaction_for(payer: &Pubkey) -> Vec<u8> {
    let message = v0::Message::try_compile(payer, &[], &[], Hash::new_unique()).unwrap();
    let transaction = VersionedTransaction {
        signatures: vec![Signature::default()],
        message: VersionedMessage::V0(message),
    };
    bincode::serialize(&transaction).unwrap()
}

#[derive(Default)]
struct ChainState {
    owners: HashMap<Pubkey, Pubkey>,
    balances: HashMap<Pubkey, String>,
    statuses: VecDeque<Result<SignatureState, String>>,
    send_error: Option<String>,
    lookup_error: Option<String>,
    hang_status_polls: bool,
    sent: Vec<VersionedTransaction>,
    created: Vec<(Pubkey, Pubkey, Pubkey)>,
    calls: Vec<&'static str>,
}

/// Scriptable `ChainClient`; clones share state.
#[derive(Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, address: Pubkey, owner: Pubkey) -> Self {
        self.state.lock().unwrap().owners.insert(address, owner);
        self
    }

    pub fn with_balance(self, token_account: Pubkey, balance: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert(token_account, balance.to_string());
        self
    }

    /// Queue status poll results; once drained every poll reports `Pending`.
    pub fn with_statuses(self, statuses: Vec<Result<SignatureState, String>>) -> Self {
        self.state.lock().unwrap().statuses = statuses.into();
        self
    }

    pub fn failing_sends(self, message: &str) -> Self {
        self.state.lock().unwrap().send_error = Some(message.to_string());
        self
    }

    pub fn failing_lookups(self, message: &str) -> Self {
        self.state.lock().unwrap().lookup_error = Some(message.to_string());
        self
    }

    /// Status polls never answer.
    pub fn hanging_status_polls(self) -> Self {
        self.state.lock().unwrap().hang_status_polls = true;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn sent(&self) -> Vec<VersionedTransaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn created(&self) -> Vec<(Pubkey, Pubkey, Pubkey)> {
        self.state.lock().unwrap().created.clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn account_owner(&self, address: &Pubkey) -> Result<Option<Pubkey>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("account_owner");
        if let Some(message) = &state.lookup_error {
            return Err(anyhow!(message.clone()));
        }
        Ok(state.owners.get(address).copied())
    }

    async fn create_associated_token_account(
        &self,
        payer: &Keypair,
        wallet: &Pubkey,
        mint: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Signature> {
        use solana_sdk::signature::Signer;

        let mut state = self.state.lock().unwrap();
        state.calls.push("create_associated_token_account");
        state.created.push((payer.pubkey(), *wallet, *mint));
        let account = spl_associated_token_account::get_associated_token_address_with_program_id(
            wallet,
            mint,
            token_program,
        );
        state.owners.insert(account, *token_program);
        Ok(Signature::new_unique())
    }

    async fn token_account_balance(&self, token_account: &Pubkey) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("token_account_balance");
        state
            .balances
            .get(token_account)
            .cloned()
            .ok_or_else(|| anyhow!("no balance for {}", token_account))
    }

    async fn send_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("send_transaction");
        if let Some(message) = &state.send_error {
            return Err(anyhow!(message.clone()));
        }
        state.sent.push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn signature_state(&self, _signature: &Signature) -> Result<SignatureState> {
        let next = {
            let mut state = self.state.lock().unwrap();
            state.calls.push("signature_state");
            if state.hang_status_polls {
                None
            } else {
                Some(state.statuses.pop_front())
            }
        };

        match next {
            None => std::future::pending().await,
            Some(Some(Ok(status))) => Ok(status),
            Some(Some(Err(message))) => Err(anyhow!(message)),
            Some(None) => Ok(SignatureState::Pending),
        }
    }
}

#[derive(Default)]
struct AggregatorState {
    quote: Option<serde_json::Value>,
    swap_payload: Option<Vec<u8>>,
    requests: Vec<SwapQuoteRequest>,
    swap_users: Vec<Pubkey>,
    swap_quotes: Vec<SwapQuote>,
    calls: Vec<&'static str>,
}

/// Scriptable `SwapAggregator`; clones share state.
#[derive(Clone, Default)]
pub struct MockAggregator {
    state: Arc<Mutex<AggregatorState>>,
}

impl MockAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(self, quote: serde_json::Value) -> Self {
        self.state.lock().unwrap().quote = Some(quote);
        self
    }

    pub fn with_swap_payload(self, payload: Vec<u8>) -> Self {
        self.state.lock().unwrap().swap_payload = Some(payload);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn quote_requests(&self) -> Vec<SwapQuoteRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn swap_users(&self) -> Vec<Pubkey> {
        self.state.lock().unwrap().swap_users.clone()
    }

    pub fn swap_quotes(&self) -> Vec<SwapQuote> {
        self.state.lock().unwrap().swap_quotes.clone()
    }
}

#[async_trait]
impl SwapAggregator for MockAggregator {
    async fn quote(&self, request: &SwapQuoteRequest) -> solana_trade_tools::error::Result<SwapQuote> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("quote");
        state.requests.push(request.clone());
        state
            .quote
            .clone()
            .map(SwapQuote)
            .ok_or_else(|| TradeError::QuoteUnavailable("aggregator responded with 400 Bad Request".to_string()))
    }

    async fn swap_transaction(
        &self,
        quote: &SwapQuote,
        user: &Pubkey,
    ) -> solana_trade_tools::error::Result<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("swap_transaction");
        state.swap_users.push(*user);
        state.swap_quotes.push(quote.clone());
        state
            .swap_payload
            .clone()
            .ok_or_else(|| TradeError::Preparation("aggregator responded with 500 Internal Server Error".to_string()))
    }
}

/// Config with fast confirmation polling for tests.
pub fn test_config() -> TraderConfig {
    TraderConfig::default().with_confirmation(1, 1)
}

pub fn dispatcher(
    aggregator: &MockAggregator,
    chain: &MockChain,
    config: &TraderConfig,
) -> Dispatcher<MockAggregator, MockChain> {
    Dispatcher::new(SolanaTrader::new(aggregator.clone(), chain.clone(), config))
}
