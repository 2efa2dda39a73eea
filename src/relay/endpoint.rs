//! Relay endpoint descriptions and their URLs

use crate::client::HttpUtils;
use crate::error::Result;
use crate::types::{Region, SubmitEncoding};
use solana_sdk::pubkey::Pubkey;

/// Tip transfer attached to every transaction sent through an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tip {
    pub receiver: Pubkey,
    pub lamports: u64,
}

/// One relay region (or custom relay URL) plus credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEndpoint {
    pub label: String,
    pub base_url: String,
    pub api_key: String,
    pub tip: Option<Tip>,
}

impl RelayEndpoint {
    pub fn new<L, B, K>(label: L, base_url: B, api_key: K) -> Self
    where
        L: Into<String>,
        B: Into<String>,
        K: Into<String>,
    {
        Self {
            label: label.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            tip: None,
        }
    }

    /// HTTPS submission endpoint for a region
    pub fn for_region(region: Region, api_key: &str) -> Self {
        Self::new(region.label(), region.relay_base_url(), api_key)
    }

    pub fn with_tip(mut self, receiver: Pubkey, lamports: u64) -> Self {
        self.tip = Some(Tip { receiver, lamports });
        self
    }

    /// `sendTransaction` JSON-RPC URL
    pub fn json_rpc_url(&self) -> Result<String> {
        HttpUtils::with_api_key(&self.base_url, &self.api_key)
    }

    /// Raw transaction upload URL
    pub fn binary_url(&self) -> Result<String> {
        let txb = HttpUtils::join_path(&self.base_url, "txb")?;
        HttpUtils::with_api_key(&txb, &self.api_key)
    }

    /// Connection warm-up URL
    pub fn health_url(&self) -> Result<String> {
        HttpUtils::join_path(&self.base_url, "health")
    }

    pub fn submit_url(&self, encoding: SubmitEncoding) -> Result<String> {
        match encoding {
            SubmitEncoding::JsonRpc => self.json_rpc_url(),
            SubmitEncoding::Binary => self.binary_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_urls() {
        let endpoint = RelayEndpoint::for_region(Region::De, "key123");
        assert_eq!(endpoint.label, "DE");
        assert_eq!(endpoint.json_rpc_url().unwrap(), "https://de.0slot.trade/?api-key=key123");
        assert_eq!(endpoint.binary_url().unwrap(), "https://de.0slot.trade/txb?api-key=key123");
        assert_eq!(endpoint.health_url().unwrap(), "https://de.0slot.trade/health");
    }

    #[test]
    fn test_custom_base_with_trailing_slash() {
        let endpoint = RelayEndpoint::new("local", "http://127.0.0.1:8899/", "k");
        assert_eq!(
            endpoint.submit_url(SubmitEncoding::Binary).unwrap(),
            "http://127.0.0.1:8899/txb?api-key=k"
        );
        assert_eq!(
            endpoint.submit_url(SubmitEncoding::JsonRpc).unwrap(),
            "http://127.0.0.1:8899/?api-key=k"
        );
    }

    #[test]
    fn test_with_tip() {
        let receiver = Pubkey::new_unique();
        let endpoint = RelayEndpoint::new("NY", "https://ny.0slot.trade", "k").with_tip(receiver, 42);
        assert_eq!(endpoint.tip, Some(Tip { receiver, lamports: 42 }));
    }
}
