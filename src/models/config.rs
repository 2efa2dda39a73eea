//! Configuration data model and validation

use crate::defaults::{
    DEFAULT_ENABLE_COLOR, DEFAULT_REQUEST_COUNT, DEFAULT_RPC_URL, MAX_REQUEST_COUNT,
};
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration shared by every subcommand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Relay API key, appended as the `api-key` query parameter
    #[serde(default)]
    pub api_key: Option<String>,

    /// RPC used for blockhash and nonce account reads
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Requests issued per benchmarked target
    #[serde(default = "default_request_count")]
    pub request_count: u32,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            rpc_url: default_rpc_url(),
            request_count: default_request_count(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.rpc_url)
            .map_err(|e| AppError::config(format!("Invalid RPC URL '{}': {}", self.rpc_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "RPC URL must use http or https: {}",
                self.rpc_url
            )));
        }

        if let Some(key) = &self.api_key {
            if key.trim().is_empty() {
                return Err(AppError::config("API key cannot be empty"));
            }
        }

        if self.request_count == 0 {
            return Err(AppError::config("Request count must be greater than 0"));
        }

        if self.request_count > MAX_REQUEST_COUNT {
            return Err(AppError::config(format!(
                "Request count cannot exceed {}",
                MAX_REQUEST_COUNT
            )));
        }

        Ok(())
    }

    /// Merge configuration from environment variables
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(key) = std::env::var("RELAY_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key.trim().to_string());
            }
        }

        if let Ok(url) = std::env::var("RPC_URL") {
            if !url.trim().is_empty() {
                self.rpc_url = url.trim().to_string();
            }
        }

        if let Ok(count) = std::env::var("REQUEST_COUNT") {
            self.request_count = count.trim().parse().map_err(|e| {
                AppError::config(format!("Invalid REQUEST_COUNT value '{}': {}", count, e))
            })?;
        }

        if let Ok(color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = color.trim().parse().map_err(|e| {
                AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", color, e))
            })?;
        }

        Ok(())
    }

    /// API key, or a configuration error naming the flag that supplies it
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::config("An API key is required (--api-key or RELAY_API_KEY)"))
    }
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_request_count() -> u32 {
    DEFAULT_REQUEST_COUNT
}

fn default_enable_color() -> bool {
    DEFAULT_ENABLE_COLOR
}
