//! Error types for zoning operations

use thiserror::Error;

use crate::types::ObjectKind;

/// Main error type for zoning operations
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Object {name} not found in defined configuration")]
    ObjectNotFound { name: String },

    #[error("Apply error: {0}")]
    Apply(#[from] ApplyError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration document and settings errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required key: {path}")]
    MissingKey { path: String },

    #[error("Malformed document at {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: ObjectKind, name: String },

    #[error("Invalid settings: {message}")]
    Settings { message: String },
}

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("deletion request rejected with {problems} problem(s)")]
    Rejected { problems: usize },

    #[error("WWNs mapped to more than one alias: {}", wwns.join(", "))]
    AmbiguousAlias { wwns: Vec<String> },
}

/// Errors returned by the fabric service for delete/create/commit
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("{operation} failed with status {status}: {message}")]
    Status {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("{operation} failed: {message}")]
    Transport { operation: String, message: String },
}

/// Login errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login rejected with status {status}")]
    Rejected { status: u16 },

    #[error("login response carried no session key")]
    MissingSessionKey,

    #[error("login request failed: {message}")]
    Transport { message: String },
}

impl ZoneError {
    /// Shorthand for a missing document key
    pub fn missing_key(path: impl Into<String>) -> Self {
        ZoneError::Configuration(ConfigError::MissingKey { path: path.into() })
    }

    /// Whether the error stems from a rejected or ambiguous request rather than a failure
    pub fn is_rejection(&self) -> bool {
        matches!(self, ZoneError::Validation(_))
    }
}
