//! Command-line interface

use crate::client::HttpUtils;
use crate::defaults::{MAX_REQUEST_COUNT, TRANSFER_LAMPORTS};
use crate::types::Region;
use clap::{ArgAction, Args, Parser, Subcommand};

/// Relay Latency Tester - measures relay latency and submits tipped transfers
#[derive(Parser, Debug, Clone)]
#[command(name = "rlt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Measure HTTP round-trip latency to relay regions or arbitrary URLs
    Bench(BenchArgs),
    /// Sign and submit a transfer with a tip using a recent blockhash
    Send(SendArgs),
    /// Submit the same durable-nonce transfer to the DE and NY relays at once
    SendNonce(SendNonceArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    /// Relay API key, required when benchmarking relay regions
    #[arg(long, env = "RELAY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Relay region to benchmark (repeatable; defaults to all regions)
    #[arg(long = "region", value_enum, action = ArgAction::Append)]
    pub regions: Vec<Region>,

    /// Extra URL to benchmark (repeatable)
    #[arg(long = "url", action = ArgAction::Append)]
    pub urls: Vec<String>,

    /// Requests per target
    #[arg(short, long)]
    pub count: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Relay API key
    #[arg(long, env = "RELAY_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Sender's base58 private key
    #[arg(long, env = "SENDER_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Public key of the tip receiver
    #[arg(long)]
    pub tip_key: String,

    /// Public key of the main receiver
    #[arg(long)]
    pub to_public_key: String,

    /// Relay region to submit to
    #[arg(long, value_enum, default_value_t = Region::De, conflicts_with = "relay_url")]
    pub region: Region,

    /// Custom relay base URL instead of a region
    #[arg(long)]
    pub relay_url: Option<String>,

    /// Post raw transaction bytes to /txb instead of JSON-RPC
    #[arg(long)]
    pub binary: bool,

    /// Warm up the relay connection before the timed submission
    #[arg(long)]
    pub keep_alive: bool,

    /// Submit twice, once cold and once after a warm-up, and report both timings
    #[arg(long, conflicts_with = "keep_alive")]
    pub compare_keep_alive: bool,

    /// Main transfer amount in lamports
    #[arg(long, default_value_t = TRANSFER_LAMPORTS)]
    pub amount: u64,

    /// Tip amount in lamports (defaults depend on the encoding)
    #[arg(long)]
    pub tip_lamports: Option<u64>,

    /// RPC used to fetch the latest blockhash
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SendNonceArgs {
    /// Relay API key
    #[arg(long, env = "RELAY_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Sender's base58 private key; also the nonce authority
    #[arg(long, env = "SENDER_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Durable nonce account
    #[arg(long)]
    pub nonce_public_key: String,

    /// Public key of the main receiver
    #[arg(long)]
    pub to_public_key: String,

    /// Main transfer amount in lamports
    #[arg(long, default_value_t = TRANSFER_LAMPORTS)]
    pub amount: u64,

    /// RPC used to read the nonce account
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Bench(args) => {
                if let Some(count) = args.count {
                    if count == 0 || count > MAX_REQUEST_COUNT {
                        return Err(format!(
                            "--count must be between 1 and {}, got {}",
                            MAX_REQUEST_COUNT, count
                        ));
                    }
                }
                for url in &args.urls {
                    HttpUtils::validate_url(url).map_err(|e| e.to_string())?;
                }
            }
            Command::Send(args) => {
                if let Some(url) = &args.relay_url {
                    HttpUtils::validate_url(url).map_err(|e| e.to_string())?;
                }
                if args.tip_lamports == Some(0) {
                    return Err("--tip-lamports must be greater than 0".to_string());
                }
            }
            Command::SendNonce(_) => {}
        }

        Ok(())
    }

    /// API key given for the subcommand, if any
    pub fn api_key(&self) -> Option<&str> {
        match &self.command {
            Command::Bench(args) => args.api_key.as_deref(),
            Command::Send(args) => Some(&args.api_key),
            Command::SendNonce(args) => Some(&args.api_key),
        }
    }

    pub fn rpc_url(&self) -> Option<&str> {
        match &self.command {
            Command::Bench(_) => None,
            Command::Send(args) => args.rpc_url.as_deref(),
            Command::SendNonce(args) => args.rpc_url.as_deref(),
        }
    }

    pub fn count(&self) -> Option<u32> {
        match &self.command {
            Command::Bench(args) => args.count,
            _ => None,
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
