use thiserror::Error;

/// Azure-specific errors that can occur during Blob service operations.
///
/// SECURITY: Error messages must NEVER contain the account key or SAS token.
#[derive(Debug, Error)]
pub enum AzureError {
    /// Connection string is malformed or lacks a usable credential
    #[error("invalid connection string: {message}")]
    InvalidConnectionString { message: String },

    /// Authentication failed (bad account key, expired SAS, etc.)
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Blob service returned an error response
    #[error("API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Network-level error (connection refused, DNS, TLS, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("container not found: '{container}'")]
    ContainerNotFound { container: String },

    /// Response body could not be parsed
    #[error("failed to parse response: {message}")]
    Parse { message: String },
}

impl From<AzureError> for crate::storage::StorageError {
    fn from(err: AzureError) -> Self {
        use crate::storage::StorageError;

        match err {
            AzureError::InvalidConnectionString { message } => {
                StorageError::InvalidConnectionString(message)
            }
            AzureError::Auth { message } => StorageError::Auth(message),
            AzureError::ContainerNotFound { container } => {
                StorageError::ContainerNotFound(container)
            }
            other => StorageError::Azure(other.to_string()),
        }
    }
}
