//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
///
/// Precedence, lowest first: built-in defaults, environment (including a
/// loaded `.env`), then command-line flags.
pub struct ConfigParser<'a> {
    cli: &'a Cli,
}

impl<'a> ConfigParser<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        if config.debug {
            for problem in EnvManager::validate_current_env() {
                eprintln!("Environment warning: {}", problem);
            }
        }

        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(key) = self.cli.api_key() {
            config.api_key = Some(key.trim().to_string());
        }

        if let Some(url) = self.cli.rpc_url() {
            config.rpc_url = url.trim().to_string();
        }

        if let Some(count) = self.cli.count() {
            config.request_count = count;
        }

        if !self.cli.use_colors() {
            config.enable_color = false;
        }

        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: &Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary for debug output; the API key is never printed
pub fn display_config_summary(config: &Config) -> String {
    let api_key = match &config.api_key {
        Some(_) => "set",
        None => "not set",
    };

    [
        format!("API Key: {}", api_key),
        format!("RPC URL: {}", config.rpc_url),
        format!("Request Count: {}", config.request_count),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ]
    .join("\n")
}
