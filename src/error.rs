use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

/// Failures that abort a migration run.
///
/// Individual upload failures are not represented here: they are recorded per
/// file in [`crate::migrate::UploadOutcome`] and only surface as
/// [`MigrateError::UploadFailed`] when every upload failed.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("no terraform.tfstate files found under {}", .root.display())]
    NoStateFiles { root: PathBuf },

    #[error("no directories starting with a digit found")]
    NoNumericDirectories,

    #[error("connection string is not configured")]
    InvalidCredential,

    #[error("connection failed: {0}")]
    Connection(#[from] StorageError),

    #[error("container '{0}' not found")]
    ContainerNotFound(String),

    #[error("all {total} uploads failed")]
    UploadFailed { total: usize },

    #[error("failed to render discovery result: {0}")]
    Render(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_state_files_display() {
        let err = MigrateError::NoStateFiles {
            root: PathBuf::from("/work/infra"),
        };
        assert_eq!(
            err.to_string(),
            "no terraform.tfstate files found under /work/infra"
        );
    }

    #[test]
    fn test_invalid_credential_display() {
        assert_eq!(
            MigrateError::InvalidCredential.to_string(),
            "connection string is not configured"
        );
    }

    #[test]
    fn test_storage_error_from_conversion() {
        let err: MigrateError = StorageError::Auth("signature mismatch".to_string()).into();
        assert!(matches!(err, MigrateError::Connection(_)));
        assert!(err.to_string().contains("signature mismatch"));
    }

    #[test]
    fn test_upload_failed_display() {
        let err = MigrateError::UploadFailed { total: 5 };
        assert_eq!(err.to_string(), "all 5 uploads failed");
    }

    #[test]
    fn test_render_error_from_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: MigrateError = json_err.into();
        assert!(matches!(err, MigrateError::Render(_)));
        assert!(err.to_string().starts_with("failed to render discovery result:"));
    }
}
