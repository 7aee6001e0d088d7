use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Failed to fetch {url}: {message}")]
    #[diagnostic(code(seminar_sync::fetch))]
    Fetch { url: String, message: String },

    #[error("Missing required field: {field}")]
    #[diagnostic(
        code(seminar_sync::extraction),
        help("the event page layout may have changed")
    )]
    Extraction { field: &'static str },

    #[error("Could not parse {input:?} as {expected}")]
    #[diagnostic(code(seminar_sync::parse))]
    Parse { input: String, expected: String },

    #[error("Calendar import error: {0}")]
    #[diagnostic(code(seminar_sync::upsert))]
    Upsert(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(seminar_sync::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(seminar_sync::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(seminar_sync::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(seminar_sync::serialization))]
    Serialization(String),

    #[error("Sync cancelled")]
    #[diagnostic(code(seminar_sync::cancelled))]
    Cancelled,

    #[error("{failed} of {total} events failed to sync")]
    #[diagnostic(
        code(seminar_sync::partial_sync),
        help("see the log for the per-event errors")
    )]
    PartialSync { failed: usize, total: usize },

    #[error("Other error: {0}")]
    #[diagnostic(code(seminar_sync::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for JSON errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create fetch errors
pub fn fetch_error(url: &str, message: &str) -> Error {
    Error::Fetch {
        url: url.to_string(),
        message: message.to_string(),
    }
}

/// Helper to create extraction errors for a required field
pub fn extraction_error(field: &'static str) -> Error {
    Error::Extraction { field }
}

/// Helper to create parse errors
pub fn parse_error(input: &str, expected: &str) -> Error {
    Error::Parse {
        input: input.to_string(),
        expected: expected.to_string(),
    }
}

/// Helper to create calendar import errors
pub fn upsert_error(message: &str) -> Error {
    Error::Upsert(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
