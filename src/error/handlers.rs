//! Standardized error handling for registry responses

use crate::error::RegistryError;
use reqwest::StatusCode;

/// Builds errors for HTTP responses an operation does not accept
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Wrap a non-accepted status together with the raw response body.
    pub fn unexpected_status(status: StatusCode, body: String, operation: &str) -> RegistryError {
        RegistryError::UnexpectedStatus {
            operation: operation.to_string(),
            status: status.as_u16(),
            body,
        }
    }
}

/// Network error categorization and handling
pub struct NetworkErrorHandler;

impl NetworkErrorHandler {
    /// Categorize and format network errors with helpful context
    pub fn handle_network_error(error: &reqwest::Error, context: &str) -> RegistryError {
        let message = if error.is_timeout() {
            format!("{} timed out: {}", context, error)
        } else if error.is_connect() {
            format!("Connection failed during {}: {}", context, error)
        } else if error.to_string().contains("certificate") {
            format!("TLS certificate error during {}: {}", context, error)
        } else {
            format!("{} network error: {}", context, error)
        };

        RegistryError::Connection(message)
    }
}
