//! Core error types for stageclock-core.
//!
//! Nothing in this hierarchy is fatal to the timer engine. Collaborator
//! failures (audio, notifications, storage) are logged and swallowed by the
//! callers; only invalid time input is surfaced back to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/data directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Reasons a free-text duration entry is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeInputError {
    #[error("empty time input")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is negative")]
    Negative(String),

    #[error("{unit} must be below 60, got {value}")]
    OutOfRange { unit: &'static str, value: u64 },

    #[error("expected at most 3 parts (H:MM:SS), got {0}")]
    TooManyParts(usize),

    #[error("duration is too large")]
    Overflow,
}

/// Audio playback/synthesis errors.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No output device or backend is available
    #[error("no audio output available: {0}")]
    Unavailable(String),

    /// The resource could not be decoded or played
    #[error("failed to play '{resource}': {message}")]
    PlaybackFailed { resource: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// System notification errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification permission denied")]
    PermissionDenied,

    #[error("failed to show notification: {0}")]
    ShowFailed(String),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}
