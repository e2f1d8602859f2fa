//! Error types for the iron-list end-to-end suite
//!
//! Messages carry the list id, slot index or WebDriver command involved so
//! a failing scenario can be diagnosed from the runner output alone.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the suite
#[derive(Error, Debug)]
pub enum Error {
    // === WebDriver Errors ===
    #[error("WebDriver '{command}' failed: {message}")]
    WebDriver { command: String, message: String },

    #[error("Could not start a WebDriver session at {url}: {message}")]
    WebDriverUnreachable { url: String, message: String },

    #[error("No element matches {0}")]
    ElementNotFound(String),

    #[error("Browser session already closed")]
    SessionClosed,

    // === Wait Errors ===
    #[error("Timed out after {secs} seconds waiting for {what}")]
    WaitTimeout { what: String, secs: u64 },

    // === Test Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Create a WebDriver command failure
    pub fn webdriver(command: &str, message: &str) -> Self {
        Self::WebDriver {
            command: command.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a wait timeout error
    pub fn wait_timeout(what: &str, secs: u64) -> Self {
        Self::WaitTimeout {
            what: what.to_string(),
            secs,
        }
    }

    /// Prefix an assertion message with the list it was made against
    pub fn on_list(self, list_id: &str) -> Self {
        match self {
            Self::TestAssertion(msg) => Self::TestAssertion(format!("list '{}': {}", list_id, msg)),
            other => other,
        }
    }

    /// Whether this is an assertion mismatch rather than an infrastructure failure
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::TestAssertion(_))
    }

    /// Whether this is a bounded wait that never succeeded
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }
}
