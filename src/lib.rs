//! Relay Latency Tester
//!
//! Measures HTTP round-trip latency against transaction relay endpoints and
//! submits signed tip-transfer transactions to them, either with a recent
//! blockhash or with a durable nonce fanned out to two regions.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod relay;
pub mod sampler;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, RunProfile, RunSummary, SampleSet, SamplerOutcome};
pub use output::{ColoredFormatter, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use relay::{RelayEndpoint, SolanaSdk, SubmissionReport, SubmissionResult, TransactionSdk};
pub use sampler::LatencySampler;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");

/// Default configuration values
pub mod defaults {
    /// Requests per benchmarked endpoint
    pub const DEFAULT_REQUEST_COUNT: u32 = 1000;
    pub const MAX_REQUEST_COUNT: u32 = 100_000;

    /// Public RPC used for blockhash and nonce account reads
    pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Main transfer amount in lamports
    pub const TRANSFER_LAMPORTS: u64 = 1;
    /// Tip attached to a single-endpoint JSON-RPC submission (0.0001 SOL)
    pub const TIP_LAMPORTS: u64 = 100_000;
    /// Tip attached to binary submissions, the relay minimum for `/txb` (0.001 SOL)
    pub const BINARY_TIP_LAMPORTS: u64 = 1_000_000;

    pub const DE_TIP_RECEIVER: &str = "6fQaVhYZA4w3MBSXjJ81Vf6W1EDYeUPXpgVQ6UQyU1Av";
    pub const NY_TIP_RECEIVER: &str = "4HiwLEP2Bzqj3hM2ENxJuzhcPCdsafwiet3oGkMkuQY4";
    pub const DE_NONCE_TIP_LAMPORTS: u64 = 1_000_000;
    pub const NY_NONCE_TIP_LAMPORTS: u64 = 100_000;

    /// Relay host suffix shared by every region
    pub const RELAY_DOMAIN: &str = "0slot.trade";
}
