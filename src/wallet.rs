//! Wallet custody: keypair generation and import from base58 secret keys.
//!
//! Nothing here touches the network and nothing is persisted.

use crate::error::{Result, TradeError};
use crate::types::Wallet;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::signer::keypair::keypair_from_seed;

/// Length of a Solana secret key (32-byte seed followed by the public key).
pub const SECRET_KEY_LENGTH: usize = 64;

/// Generate a fresh keypair.
pub fn create_wallet() -> Wallet {
    let keypair = Keypair::new();
    Wallet {
        public_key: keypair.pubkey().to_string(),
        private_key: keypair.to_base58_string(),
    }
}

/// Derive a wallet from a base58-encoded secret key.
///
/// The returned `private_key` is the caller's input, unchanged.
pub fn import_wallet(private_key: &str) -> Result<Wallet> {
    let keypair = keypair_from_base58(private_key)?;
    Ok(Wallet {
        public_key: keypair.pubkey().to_string(),
        private_key: private_key.to_string(),
    })
}

/// Decode a base58 secret key into a keypair.
///
/// Errors never include any of the decoded bytes.
pub fn keypair_from_base58(private_key: &str) -> Result<Keypair> {
    let bytes = bs58::decode(private_key.trim())
        .into_vec()
        .map_err(|_| TradeError::InvalidKey("not a valid base58 string".to_string()))?;

    if bytes.len() != SECRET_KEY_LENGTH {
        return Err(TradeError::InvalidKey(format!(
            "expected {} bytes, decoded {}",
            SECRET_KEY_LENGTH,
            bytes.len()
        )));
    }

    let (seed, public) = bytes.split_at(SECRET_KEY_LENGTH / 2);
    let keypair = keypair_from_seed(seed)
        .map_err(|_| TradeError::InvalidKey("seed rejected".to_string()))?;

    // The trailing half must be the public key the seed derives
    if keypair.pubkey().as_ref() != public {
        return Err(TradeError::InvalidKey(
            "secret and public halves do not match".to_string(),
        ));
    }

    Ok(keypair)
}
