//! Type definitions and aliases

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

use crate::defaults::{
    DE_NONCE_TIP_LAMPORTS, DE_TIP_RECEIVER, NY_NONCE_TIP_LAMPORTS, NY_TIP_RECEIVER, RELAY_DOMAIN,
};

/// Relay regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Region {
    /// Frankfurt
    De,
    /// New York
    Ny,
    /// Amsterdam
    Ams,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::De, Region::Ny, Region::Ams];

    /// Short label used when reporting results
    pub fn label(&self) -> &'static str {
        match self {
            Region::De => "DE",
            Region::Ny => "NY",
            Region::Ams => "AMS",
        }
    }

    fn host_prefix(&self) -> &'static str {
        match self {
            Region::De => "de",
            Region::Ny => "ny",
            Region::Ams => "ams",
        }
    }

    /// Plain HTTP latency probe host, e.g. `http://de1.0slot.trade/`
    pub fn probe_base_url(&self) -> String {
        format!("http://{}1.{}/", self.host_prefix(), RELAY_DOMAIN)
    }

    /// HTTPS submission host, e.g. `https://de.0slot.trade`
    pub fn relay_base_url(&self) -> String {
        format!("https://{}.{}", self.host_prefix(), RELAY_DOMAIN)
    }

    /// Tip receiver and amount used for nonce submissions through this region
    pub fn nonce_tip(&self) -> Option<(&'static str, u64)> {
        match self {
            Region::De => Some((DE_TIP_RECEIVER, DE_NONCE_TIP_LAMPORTS)),
            Region::Ny => Some((NY_TIP_RECEIVER, NY_NONCE_TIP_LAMPORTS)),
            Region::Ams => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a batch of independent operations is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// One at a time, each started after the previous one is recorded
    Sequential,
    /// All started together, each awaited independently
    FanOut,
}

/// Wire encoding for relay submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubmitEncoding {
    /// `sendTransaction` JSON-RPC call with a base64 payload
    #[default]
    JsonRpc,
    /// Raw bincode bytes posted to the `/txb` path
    Binary,
}

impl SubmitEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            SubmitEncoding::JsonRpc => "json-rpc",
            SubmitEncoding::Binary => "binary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_urls() {
        assert_eq!(Region::De.probe_base_url(), "http://de1.0slot.trade/");
        assert_eq!(Region::Ams.relay_base_url(), "https://ams.0slot.trade");
        assert_eq!(Region::Ny.to_string(), "NY");
    }

    #[test]
    fn test_nonce_tips_only_for_fan_out_regions() {
        assert_eq!(Region::De.nonce_tip().map(|(_, l)| l), Some(1_000_000));
        assert_eq!(Region::Ny.nonce_tip().map(|(_, l)| l), Some(100_000));
        assert!(Region::Ams.nonce_tip().is_none());
    }
}
