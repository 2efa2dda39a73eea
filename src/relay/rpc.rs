//! JSON-RPC reads: latest blockhash and durable nonce accounts

use crate::client::HttpClient;
use crate::error::{AppError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use std::str::FromStr;
use std::sync::Arc;

/// Size of a nonce account's data
pub const NONCE_ACCOUNT_LEN: usize = 80;
const NONCE_BLOCKHASH_RANGE: std::ops::Range<usize> = 40..72;
const NONCE_VERSION_CURRENT: u32 = 1;
const NONCE_STATE_INITIALIZED: u32 = 1;

/// Minimal JSON-RPC reader over the shared HTTP client
pub struct RpcReader {
    client: Arc<dyn HttpClient>,
    url: String,
}

impl RpcReader {
    pub fn new(client: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Issue one call and return its `result` member
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post_json(&self.url, &request)
            .await
            .map_err(|e| AppError::rpc(format!("{} request to {} failed: {}", method, self.url, e)))?;

        if !response.is_success() {
            return Err(AppError::rpc(format!(
                "{} returned HTTP {}: {}",
                method, response.status_code, response.body
            )));
        }

        let mut body = response.json()?;
        if let Some(error) = body.get("error") {
            return Err(AppError::rpc(format!("{} failed: {}", method, error)));
        }

        match body.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(AppError::rpc(format!("{} response has no result", method))),
        }
    }

    /// Most recent blockhash at finalized commitment
    pub async fn latest_blockhash(&self) -> Result<Hash> {
        let result = self
            .call("getLatestBlockhash", json!([{ "commitment": "finalized" }]))
            .await?;

        let encoded = result
            .pointer("/value/blockhash")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::rpc("getLatestBlockhash response has no blockhash"))?;

        Hash::from_str(encoded)
            .map_err(|e| AppError::parse(format!("Invalid blockhash '{}': {}", encoded, e)))
    }

    /// Blockhash stored in a durable nonce account
    pub async fn nonce_blockhash(&self, account: &Pubkey) -> Result<Hash> {
        let result = self
            .call(
                "getAccountInfo",
                json!([account.to_string(), { "encoding": "base64" }]),
            )
            .await?;

        let value = result
            .get("value")
            .filter(|v| !v.is_null())
            .ok_or_else(|| AppError::rpc(format!("Nonce account {} not found", account)))?;

        let encoded = value
            .pointer("/data/0")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::parse(format!("Nonce account {} has no base64 data", account)))?;

        let data = STANDARD.decode(encoded)?;
        parse_nonce_account(&data)
    }
}

/// Extract the stored blockhash from raw nonce account data
///
/// Layout: version u32, state u32, authority (32 bytes), blockhash
/// (32 bytes), fee calculator (8 bytes). Only the current version (1) is
/// accepted; legacy version 0 accounts hold a blockhash that is not the
/// durable nonce value.
pub fn parse_nonce_account(data: &[u8]) -> Result<Hash> {
    if data.len() < NONCE_ACCOUNT_LEN {
        return Err(AppError::parse(format!(
            "Nonce account data is {} bytes, expected {}",
            data.len(),
            NONCE_ACCOUNT_LEN
        )));
    }

    let version = read_u32(data, 0);
    if version != NONCE_VERSION_CURRENT {
        return Err(AppError::parse(format!(
            "Unsupported nonce account version {}, expected {}",
            version, NONCE_VERSION_CURRENT
        )));
    }

    if read_u32(data, 4) != NONCE_STATE_INITIALIZED {
        return Err(AppError::parse("Nonce account is not initialized"));
    }

    let mut blockhash = [0u8; 32];
    blockhash.copy_from_slice(&data[NONCE_BLOCKHASH_RANGE]);
    Ok(Hash::new_from_array(blockhash))
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}
