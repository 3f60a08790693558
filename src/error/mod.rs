//! Error types and handlers for registry operations
//!
//! Every failure reaching a caller is one of the [`RegistryError`] variants.
//! Unexpected HTTP statuses keep the raw response body so the caller can
//! log or surface it verbatim.

pub mod handlers;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Network, TLS or timeout failure while reaching the registry
    #[error("Connection error: {0}")]
    Connection(String),

    /// Registry answered with a status the operation does not accept
    #[error("failed to {operation}: {status} - {body}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },

    /// Malformed JSON or header content in a registry response
    #[error("Decode error: {0}")]
    Decode(String),

    /// No active connection, or nothing selectable in a manifest list
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid caller-supplied parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid local configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RegistryError {
    /// HTTP status carried by an [`RegistryError::UnexpectedStatus`].
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistryError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for RegistryError {
    fn from(err: url::ParseError) -> Self {
        RegistryError::Validation(err.to_string())
    }
}
