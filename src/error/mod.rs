//! Error handling for the relay latency tester

use thiserror::Error;

/// Exit code for rejected command-line arguments, shared with clap
pub const USAGE_EXIT_CODE: i32 = 2;

/// Custom error types for the relay latency tester
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parsing errors (URLs, JSON, account data, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Key decoding and signing errors
    #[error("Key error: {0}")]
    Key(String),

    /// Blockhash or nonce account read failures
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Submission rejected by the relay
    #[error("Relay error: {0}")]
    Relay(String),

    /// Statistics calculation errors
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    /// Create a new HTTP request error
    pub fn http_request<S: Into<String>>(message: S) -> Self {
        Self::HttpRequest(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new key error
    pub fn key<S: Into<String>>(message: S) -> Self {
        Self::Key(message.into())
    }

    /// Create a new RPC read error
    pub fn rpc<S: Into<String>>(message: S) -> Self {
        Self::Rpc(message.into())
    }

    /// Create a new relay submission error
    pub fn relay<S: Into<String>>(message: S) -> Self {
        Self::Relay(message.into())
    }

    /// Create a new statistics error
    pub fn statistics<S: Into<String>>(message: S) -> Self {
        Self::Statistics(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Network(_) => "NETWORK",
            Self::HttpRequest(_) => "HTTP",
            Self::Timeout(_) => "TIMEOUT",
            Self::Validation(_) => "VALIDATION",
            Self::Parse(_) => "PARSE",
            Self::Key(_) => "KEY",
            Self::Rpc(_) => "RPC",
            Self::Relay(_) => "RELAY",
            Self::Statistics(_) => "STATS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Transport-level failures that a sampling loop skips over
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpRequest(_) | Self::Timeout(_))
    }

    /// Check if error is recoverable (running again may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(_) | Self::HttpRequest(_) | Self::Timeout(_) | Self::Rpc(_) | Self::Relay(_) => true,
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) | Self::Key(_) => false,
            Self::Statistics(_) | Self::Internal(_) => false,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Network(msg) => {
                format!("Network connectivity issue: {}\n\nSuggestion: Check your internet connection and try again.", msg)
            }
            Self::HttpRequest(msg) => {
                format!("HTTP request failed: {}\n\nSuggestion: The relay may be down or rejecting requests. Try another region.", msg)
            }
            Self::Timeout(msg) => {
                format!("Request timed out: {}\n\nSuggestion: Check your network connection or pick a closer region.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Check the format of your URLs and public keys.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the format of your input data or the RPC response.", msg)
            }
            Self::Key(msg) => {
                format!("Key problem: {}\n\nSuggestion: Private keys are base58-encoded 64-byte keypairs; public keys are base58 addresses.", msg)
            }
            Self::Rpc(msg) => {
                format!("RPC read failed: {}\n\nSuggestion: Try a different --rpc-url or check that the nonce account exists.", msg)
            }
            Self::Relay(msg) => {
                format!("Relay rejected the submission: {}\n\nSuggestion: Check your API key and that the tip meets the relay minimum.", msg)
            }
            Self::Statistics(msg) => {
                format!("Statistics calculation failed: {}\n\nSuggestion: This may indicate insufficient or invalid sample data.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    ///
    /// Never [`USAGE_EXIT_CODE`], which is reserved for argument errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::Timeout(_) => 3,
            Self::Key(_) => 4,
            Self::Rpc(_) | Self::Relay(_) => 5,
            Self::Statistics(_) => 6,
            Self::Network(_) | Self::HttpRequest(_) => 7,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) | Self::Key(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Network(_) | Self::HttpRequest(_) | Self::Rpc(_) | Self::Relay(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Timeout(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::Statistics(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else if error.is_connect() || error.is_request() {
            Self::network(error.to_string())
        } else {
            Self::http_request(error.to_string())
        }
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<bs58::decode::Error> for AppError {
    fn from(error: bs58::decode::Error) -> Self {
        Self::key(format!("base58 decode error: {}", error))
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(error: base64::DecodeError) -> Self {
        Self::parse(format!("base64 decode error: {}", error))
    }
}

impl From<bincode::Error> for AppError {
    fn from(error: bincode::Error) -> Self {
        Self::internal(format!("Transaction serialization failed: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error reporter for structured error logging and user feedback
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render an error the way it is shown on stderr
    pub fn render(&self, error: &AppError) -> String {
        let mut out = error.format_for_console(self.use_color);

        if self.verbose {
            out.push_str("\n\n");
            out.push_str(&error.user_friendly_message());

            if error.is_recoverable() {
                out.push_str("\n\n");
                let hint = "This error might be temporary. You can try running the command again.";
                if self.use_color {
                    use colored::Colorize;
                    out.push_str(&hint.green().to_string());
                } else {
                    out.push_str(hint);
                }
            }
        }

        out
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(AppError::config("x").category(), "CONFIG");
        assert_eq!(AppError::key("x").category(), "KEY");
        assert_eq!(AppError::relay("x").category(), "RELAY");
        assert_eq!(AppError::rpc("x").category(), "RPC");
    }

    #[test]
    fn test_transport_classification() {
        assert!(AppError::network("refused").is_transport());
        assert!(AppError::timeout("slow").is_transport());
        assert!(AppError::http_request("reset").is_transport());
        assert!(!AppError::relay("rejected").is_transport());
        assert!(!AppError::key("bad").is_transport());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("x").exit_code(), 1);
        assert_eq!(AppError::timeout("x").exit_code(), 3);
        assert_eq!(AppError::key("x").exit_code(), 4);
        assert_eq!(AppError::rpc("x").exit_code(), 5);
        assert_eq!(AppError::statistics("x").exit_code(), 6);
        assert_eq!(AppError::network("x").exit_code(), 7);
        assert_eq!(AppError::http_request("x").exit_code(), 7);
        assert_eq!(AppError::internal("x").exit_code(), 99);
    }

    #[test]
    fn test_exit_codes_never_collide_with_usage_errors() {
        let all = [
            AppError::config("x"),
            AppError::network("x"),
            AppError::http_request("x"),
            AppError::timeout("x"),
            AppError::validation("x"),
            AppError::parse("x"),
            AppError::key("x"),
            AppError::rpc("x"),
            AppError::relay("x"),
            AppError::statistics("x"),
            AppError::internal("x"),
        ];
        for error in &all {
            assert_ne!(error.exit_code(), USAGE_EXIT_CODE, "{}", error.category());
            assert_ne!(error.exit_code(), 0, "{}", error.category());
        }
    }

    #[test]
    fn test_plain_console_format() {
        let error = AppError::relay("Invalid api key");
        assert_eq!(
            error.format_for_console(false),
            "[RELAY] Relay error: Invalid api key"
        );
    }

    #[test]
    fn test_bs58_conversion_is_key_error() {
        let err = bs58::decode("0OIl").into_vec().unwrap_err();
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::Key(_)));
    }

    #[test]
    fn test_verbose_render_includes_suggestion() {
        let reporter = ErrorReporter::new(false, true);
        let rendered = reporter.render(&AppError::network("connection refused"));
        assert!(rendered.contains("[NETWORK]"));
        assert!(rendered.contains("Suggestion:"));
        assert!(rendered.contains("might be temporary"));

        let quiet = ErrorReporter::new(false, false).render(&AppError::key("bad key"));
        assert!(!quiet.contains("Suggestion:"));
    }
}
