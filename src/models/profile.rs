//! Run profiles: what a single invocation runs
//!
//! Each profile fixes the endpoint set, the repetition count and the
//! concurrency mode, so the sampler and the submitter stay parameterized
//! instead of being duplicated per region.

use crate::client::HttpUtils;
use crate::error::Result;
use crate::relay::RelayEndpoint;
use crate::types::{ConcurrencyMode, Region, SubmitEncoding};
use serde::{Deserialize, Serialize};

/// A labelled URL to sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub label: String,
    pub url: String,
}

impl Target {
    pub fn new<L: Into<String>, U: Into<String>>(label: L, url: U) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    /// Latency probe for a relay region, authenticated with the API key
    pub fn for_region(region: Region, api_key: &str) -> Result<Self> {
        let url = HttpUtils::with_api_key(&region.probe_base_url(), api_key)?;
        Ok(Self::new(
            format!("{}_domain", region.label().to_lowercase()),
            url,
        ))
    }
}

/// Enumerated run configurations
#[derive(Debug, Clone)]
pub enum RunProfile {
    /// Sample each target in turn
    LatencySweep {
        targets: Vec<Target>,
        repetitions: u32,
    },
    /// One tip transfer through one relay
    TipTransfer {
        endpoint: RelayEndpoint,
        encoding: SubmitEncoding,
        keep_alive: bool,
    },
    /// Two tip transfers through one relay, cold then after a warm-up
    KeepAliveComparison {
        endpoint: RelayEndpoint,
        encoding: SubmitEncoding,
    },
    /// The same durable-nonce transfer submitted to two relays at once
    NonceFanOut { endpoints: [RelayEndpoint; 2] },
}

impl RunProfile {
    pub fn concurrency(&self) -> ConcurrencyMode {
        match self {
            RunProfile::LatencySweep { .. }
            | RunProfile::TipTransfer { .. }
            | RunProfile::KeepAliveComparison { .. } => ConcurrencyMode::Sequential,
            RunProfile::NonceFanOut { .. } => ConcurrencyMode::FanOut,
        }
    }

    /// Requests per target, or one submission per endpoint
    pub fn repetitions(&self) -> u32 {
        match self {
            RunProfile::LatencySweep { repetitions, .. } => *repetitions,
            RunProfile::KeepAliveComparison { .. } => 2,
            RunProfile::TipTransfer { .. } | RunProfile::NonceFanOut { .. } => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RunProfile::LatencySweep { .. } => "latency-sweep",
            RunProfile::TipTransfer { .. } => "tip-transfer",
            RunProfile::KeepAliveComparison { .. } => "keep-alive-comparison",
            RunProfile::NonceFanOut { .. } => "nonce-fan-out",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_target() {
        let target = Target::for_region(Region::Ams, "xxx").unwrap();
        assert_eq!(target.label, "ams_domain");
        assert_eq!(target.url, "http://ams1.0slot.trade/?api-key=xxx");
    }

    #[test]
    fn test_region_target_encodes_reserved_key_characters() {
        let key = "ab#c&d=1+%";
        let target = Target::for_region(Region::De, key).unwrap();

        let parsed = url::Url::parse(&target.url).unwrap();
        assert!(parsed.fragment().is_none());
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("api-key".to_string(), key.to_string())]);
    }

    #[test]
    fn test_profile_modes() {
        let sweep = RunProfile::LatencySweep {
            targets: vec![Target::new("local", "http://127.0.0.1/")],
            repetitions: 10,
        };
        assert_eq!(sweep.concurrency(), ConcurrencyMode::Sequential);
        assert_eq!(sweep.repetitions(), 10);

        let de = RelayEndpoint::new("DE", "http://127.0.0.1:1", "k");
        let ny = RelayEndpoint::new("NY", "http://127.0.0.1:2", "k");
        let fan_out = RunProfile::NonceFanOut { endpoints: [de, ny] };
        assert_eq!(fan_out.concurrency(), ConcurrencyMode::FanOut);
        assert_eq!(fan_out.repetitions(), 1);
        assert_eq!(fan_out.name(), "nonce-fan-out");

        let comparison = RunProfile::KeepAliveComparison {
            endpoint: RelayEndpoint::new("DE", "http://127.0.0.1:1", "k"),
            encoding: SubmitEncoding::JsonRpc,
        };
        assert_eq!(comparison.concurrency(), ConcurrencyMode::Sequential);
        assert_eq!(comparison.repetitions(), 2);
        assert_eq!(comparison.name(), "keep-alive-comparison");
    }
}
