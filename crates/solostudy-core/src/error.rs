//! Core error types for solostudy-core.
//!
//! Planning failures are typed in [`PlanError`]; storage and configuration
//! failures get their own enums, and [`CoreError`] wraps all of them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for solostudy-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Planning and import failures
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of a planning or import operation.
///
/// All of them are terminal for the operation: nothing is applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("no subjects to plan with; add some courses first")]
    EmptySubjects,

    #[error("invalid time range: {start} to {end} leaves no study time")]
    InvalidTimeRange { start: String, end: String },

    #[error("invalid clock '{0}': expected HH:MM (24-hour)")]
    InvalidClock(String),

    #[error("invalid {field} duration: must be at least one minute")]
    InvalidDuration { field: &'static str },

    #[error("couldn't find any course codes (e.g. MTH101) in the text")]
    NoCourseCodesFound,

    #[error("found {found} course code(s), but all of them are already added")]
    AllDuplicates { found: usize },

    #[error("unsupported text source: {0}")]
    UnsupportedTextSource(String),

    #[error("corrupt backup: {0}")]
    CorruptBackup(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
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

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Could not resolve the data directory
    #[error("data directory unavailable: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_error_is_transparent_inside_core_error() {
        let err: CoreError = PlanError::EmptySubjects.into();
        assert_eq!(err.to_string(), PlanError::EmptySubjects.to_string());
    }

    #[test]
    fn all_duplicates_reports_count() {
        let err = PlanError::AllDuplicates { found: 3 };
        assert!(err.to_string().contains('3'));
    }
}
