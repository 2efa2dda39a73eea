//! Decoding of base58 keys supplied on the command line

use crate::error::{AppError, Result};
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use std::str::FromStr;

/// Decode a base58 64-byte secret key into a keypair
pub fn parse_keypair(encoded: &str) -> Result<Keypair> {
    let bytes = bs58::decode(encoded.trim()).into_vec()?;
    if bytes.len() != 64 {
        return Err(AppError::key(format!(
            "Private key must decode to 64 bytes, got {}",
            bytes.len()
        )));
    }
    Keypair::from_bytes(&bytes).map_err(|e| AppError::key(format!("Invalid private key: {}", e)))
}

/// Parse a base58 public key, naming the flag in the error
pub fn parse_pubkey(encoded: &str, what: &str) -> Result<Pubkey> {
    Pubkey::from_str(encoded.trim())
        .map_err(|e| AppError::key(format!("Invalid {} '{}': {}", what, encoded, e)))
}
