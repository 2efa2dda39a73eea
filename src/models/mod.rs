//! Data models and structures for the relay latency tester

pub mod config;
pub mod metrics;
pub mod profile;

// Re-export main model types
pub use config::Config;
pub use metrics::{Percentile, RunSummary, SampleSet, SamplerOutcome};
pub use profile::{RunProfile, Target};
