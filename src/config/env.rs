//! Environment variable handling and .env file loading

use crate::defaults::MAX_REQUEST_COUNT;
use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env from the current directory if it exists
    pub fn load_env_file(debug: bool) -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a dotenv file without overriding variables already set
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<bool> {
        if !path.exists() {
            if debug {
                eprintln!("No {} file found, using defaults and CLI arguments", path.display());
            }
            return Ok(false);
        }

        dotenv::from_path(path).map_err(|e| {
            AppError::config(format!("Failed to load {}: {}", path.display(), e))
        })?;

        if debug {
            eprintln!("Loaded configuration from {}", path.display());
        }
        Ok(true)
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "RELAY_API_KEY" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("RELAY_API_KEY cannot be empty"));
                }
            }
            "SENDER_PRIVATE_KEY" => {
                let bytes = bs58::decode(value.trim()).into_vec().map_err(|e| {
                    AppError::config(format!("SENDER_PRIVATE_KEY is not valid base58: {}", e))
                })?;
                if bytes.len() != 64 {
                    return Err(AppError::config(format!(
                        "SENDER_PRIVATE_KEY must decode to 64 bytes, got {}",
                        bytes.len()
                    )));
                }
            }
            "RPC_URL" => {
                let parsed = url::Url::parse(value.trim()).map_err(|e| {
                    AppError::config(format!("Invalid RPC_URL value '{}': {}", value, e))
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(AppError::config(format!("RPC_URL must use http or https: {}", value)));
                }
            }
            "REQUEST_COUNT" => {
                let count: u32 = value.trim().parse().map_err(|e| {
                    AppError::config(format!("Invalid REQUEST_COUNT value '{}': {}", value, e))
                })?;
                if count == 0 || count > MAX_REQUEST_COUNT {
                    return Err(AppError::config(format!(
                        "REQUEST_COUNT must be between 1 and {}, got: {}",
                        MAX_REQUEST_COUNT, count
                    )));
                }
            }
            "ENABLE_COLOR" => {
                value.trim().parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e))
                })?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Supported environment variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("RELAY_API_KEY", "API key appended to relay URLs", "your-api-key"),
            ("SENDER_PRIVATE_KEY", "Base58 keypair that pays and signs", "4Z7c...base58"),
            ("RPC_URL", "RPC for blockhash and nonce reads", "https://api.mainnet-beta.solana.com"),
            ("REQUEST_COUNT", "Requests per benchmarked target", "1000"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Check every supported variable currently set; returns the problems found
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(key, _, _)| {
                let value = std::env::var(key).ok()?;
                Self::validate_env_var(key, &value).err().map(|e| e.to_string())
            })
            .collect()
    }
}
