//! Core error types for respira-core.
//!
//! Each concern gets its own thiserror enum; `CoreError` is the umbrella
//! used at the CLI boundary. Nothing here is fatal to the surrounding
//! process -- every failure is scoped to one run or one query.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::SessionStatus;

/// Top-level error type for respira-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session engine errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// History store errors
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the session engine's state machine.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Illegal state-machine call; the run state is left unchanged.
    #[error("cannot {action} while {from:?}")]
    InvalidTransition {
        from: SessionStatus,
        action: &'static str,
    },

    /// The pattern violates a duration invariant; the engine stays idle.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] PatternError),
}

/// Pattern invariant violations.
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("{field} must be greater than zero")]
    ZeroPhaseDuration { field: &'static str },

    #[error("cycle count must be greater than zero")]
    ZeroCycles,

    #[error("unknown sound profile '{0}'")]
    UnknownSoundProfile(String),
}

/// History store errors.
///
/// Recording failures are caught and logged at the recorder boundary and
/// never reach the engine; query failures surface to the analytics caller so
/// statistics are never computed from partial data.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Failed to open the store
    #[error("failed to open history store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("history store migration failed: {0}")]
    MigrationFailed(String),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<rusqlite::Error> for HistoryError {
    fn from(err: rusqlite::Error) -> Self {
        HistoryError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
