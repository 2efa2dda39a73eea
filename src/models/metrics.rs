//! Sample sets and run summaries for latency sampling

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ordered elapsed-time measurements, one per completed request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    samples: Vec<Duration>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Append one measurement
    pub fn record(&mut self, elapsed: Duration) {
        self.samples.push(elapsed);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Measurements as floating-point seconds, in recording order
    pub fn seconds(&self) -> Vec<f64> {
        self.samples.iter().map(Duration::as_secs_f64).collect()
    }
}

impl FromIterator<Duration> for SampleSet {
    fn from_iter<I: IntoIterator<Item = Duration>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// One percentile value of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentile {
    /// Requested rank, 0-100
    pub rank: u8,
    pub seconds: f64,
}

/// Aggregate of a non-empty sample set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub label: String,
    pub url: String,
    pub attempted: u32,
    pub successful: u32,
    pub mean_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
    pub percentiles: Vec<Percentile>,
}

impl RunSummary {
    /// Value at the given percentile rank, if it was computed
    pub fn percentile(&self, rank: u8) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|p| p.rank == rank)
            .map(|p| p.seconds)
    }

    /// Successful requests as a percentage of attempts
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            (self.successful as f64 / self.attempted as f64) * 100.0
        }
    }
}

/// Result of sampling one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SamplerOutcome {
    /// At least one request succeeded
    Summary(RunSummary),
    /// Every request failed; no aggregate was computed
    NoData {
        label: String,
        url: String,
        attempted: u32,
    },
}

impl SamplerOutcome {
    pub fn label(&self) -> &str {
        match self {
            SamplerOutcome::Summary(summary) => &summary.label,
            SamplerOutcome::NoData { label, .. } => label,
        }
    }

    pub fn attempted(&self) -> u32 {
        match self {
            SamplerOutcome::Summary(summary) => summary.attempted,
            SamplerOutcome::NoData { attempted, .. } => *attempted,
        }
    }

    pub fn successful(&self) -> u32 {
        match self {
            SamplerOutcome::Summary(summary) => summary.successful,
            SamplerOutcome::NoData { .. } => 0,
        }
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            SamplerOutcome::Summary(summary) => Some(summary),
            SamplerOutcome::NoData { .. } => None,
        }
    }

    pub fn has_data(&self) -> bool {
        matches!(self, SamplerOutcome::Summary(_))
    }
}
