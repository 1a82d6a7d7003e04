//! The migration pipeline.
//!
//! Discover → Classify → Validate connection → Upload → List-and-confirm.
//! Each stage either hands its result to the next one or aborts the run with
//! a [`MigrateError`]. Upload failures are isolated per file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::error::MigrateError;
use crate::output;
use crate::remote::RemoteBlob;
use crate::storage::{self, BlobStore, StorageError};
use crate::terraform::{StateFile, find_state_files, numeric_directories};

/// Values shipped in sample configs that mean "not configured yet".
pub const PLACEHOLDER_CONNECTION_STRINGS: &[&str] =
    &["sua_connection_string_aqui", "your_connection_string_here"];

#[derive(Debug, Clone, Serialize)]
pub struct MigrationPlan {
    pub root: PathBuf,
    pub state_files: Vec<StateFile>,
    pub numeric_directories: Vec<String>,
}

impl MigrationPlan {
    /// Runs discovery and classification without judging the result.
    pub fn discover(root: &Path) -> Self {
        let state_files = find_state_files(root);
        let numeric_directories = numeric_directories(&state_files);

        Self {
            root: root.to_path_buf(),
            state_files,
            numeric_directories,
        }
    }

    pub fn to_json(&self) -> Result<String, MigrateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(self) -> Result<Self, MigrateError> {
        if self.state_files.is_empty() {
            return Err(MigrateError::NoStateFiles { root: self.root });
        }
        if self.numeric_directories.is_empty() {
            return Err(MigrateError::NoNumericDirectories);
        }
        Ok(self)
    }
}

pub fn plan(root: &Path) -> Result<MigrationPlan, MigrateError> {
    MigrationPlan::discover(root).validate()
}

/// Rejects blank and placeholder credentials before any network call.
pub fn validate_credential(connection_string: &str) -> Result<(), MigrateError> {
    let trimmed = connection_string.trim();
    if trimmed.is_empty() || PLACEHOLDER_CONNECTION_STRINGS.contains(&trimmed) {
        return Err(MigrateError::InvalidCredential);
    }
    Ok(())
}

/// Builds a store for `connection_string` and proves the container is reachable.
pub async fn connect(
    connection_string: &str,
    container: &str,
    numeric_directories: &[String],
) -> Result<Box<dyn BlobStore>, MigrateError> {
    validate_credential(connection_string)?;

    output::print_connecting();
    let store = storage::connect(connection_string)?;
    verify_container(store.as_ref(), container, numeric_directories).await?;

    Ok(store)
}

pub async fn verify_container(
    store: &dyn BlobStore,
    container: &str,
    numeric_directories: &[String],
) -> Result<(), MigrateError> {
    // Blob storage has no real directories; nothing is created per entry.
    tracing::debug!(
        ?numeric_directories,
        "numeric directories are informational only"
    );

    let containers = store.list_containers().await?;
    tracing::info!(backend = store.name(), count = containers.len(), "connection established");
    output::print_connected(containers.len());

    match store.container_exists(container).await {
        Ok(()) => {
            output::print_container_found(container);
            Ok(())
        }
        Err(StorageError::ContainerNotFound(_)) => {
            Err(MigrateError::ContainerNotFound(container.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Error)]
pub enum UploadFailure {
    #[error("path is not valid UTF-8: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("local file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read local file: {0}")]
    Read(#[from] std::io::Error),
    #[error("upload failed: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub local_path: PathBuf,
    /// Destination blob, or a lossy rendering of the local path when it has none.
    pub blob_name: String,
    /// Bytes uploaded on success.
    pub result: Result<u64, UploadFailure>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct UploadSummary {
    pub outcomes: Vec<UploadOutcome>,
}

impl UploadSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// The step passes when at least one file made it.
    pub fn is_success(&self) -> bool {
        self.succeeded() > 0
    }
}

pub async fn upload_state_files(
    store: &dyn BlobStore,
    container: &str,
    files: &[StateFile],
) -> UploadSummary {
    let total = files.len();
    output::print_upload_start(total);

    let mut summary = UploadSummary::default();
    for (index, file) in files.iter().enumerate() {
        let (blob_name, result) = match file.blob_name() {
            Some(blob_name) => {
                let result = transfer(store, container, file, &blob_name).await;
                (blob_name, result)
            }
            None => (
                file.relative_path.display().to_string(),
                Err(UploadFailure::InvalidPath(file.relative_path.clone())),
            ),
        };

        let outcome = UploadOutcome {
            local_path: file.relative_path.clone(),
            blob_name,
            result,
        };

        match &outcome.result {
            Ok(size) => tracing::debug!(blob = %outcome.blob_name, size, "uploaded"),
            Err(err) => tracing::warn!(
                file = %outcome.local_path.display(),
                error = %err,
                "upload failed"
            ),
        }

        output::print_upload_line(index + 1, total, &outcome);
        summary.outcomes.push(outcome);
    }

    output::print_upload_summary(&summary);
    summary
}

async fn transfer(
    store: &dyn BlobStore,
    container: &str,
    file: &StateFile,
    blob_name: &str,
) -> Result<u64, UploadFailure> {
    if !file.exists() {
        return Err(UploadFailure::Missing(file.relative_path.clone()));
    }

    let data = tokio::fs::read(&file.path).await?;
    let size = data.len() as u64;
    store.upload(container, blob_name, data).await?;

    Ok(size)
}

/// Remote blobs whose name ends in `terraform.tfstate`.
pub async fn list_uploaded(
    store: &dyn BlobStore,
    container: &str,
) -> Result<Vec<RemoteBlob>, StorageError> {
    let blobs = store.list_blobs(container).await?;
    Ok(blobs.into_iter().filter(RemoteBlob::is_state_file).collect())
}

/// Prints the remote state files and returns how many there are.
/// A failed listing counts as zero confirmed files.
pub async fn confirm_uploads(store: &dyn BlobStore, container: &str) -> usize {
    output::print_listing_header(container);

    match list_uploaded(store, container).await {
        Ok(blobs) => {
            output::print_remote_blobs(&blobs);
            blobs.len()
        }
        Err(err) => {
            tracing::warn!(container, error = %err, "listing failed");
            output::print_listing_error(&err);
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub total: usize,
    pub uploaded: usize,
    pub failed: usize,
    pub confirmed: usize,
}

pub struct Migration {
    root: PathBuf,
    container: String,
}

impl Migration {
    pub fn new(root: impl Into<PathBuf>, container: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            container: container.into(),
        }
    }

    /// Full pipeline against the store described by `connection_string`.
    pub async fn run(&self, connection_string: &str) -> Result<MigrationReport, MigrateError> {
        output::print_start(&self.root);

        let plan = MigrationPlan::discover(&self.root);
        output::print_plan(&plan);
        let plan = plan.validate()?;

        let store = connect(connection_string, &self.container, &plan.numeric_directories).await?;
        self.execute(&plan, store.as_ref()).await
    }

    /// Upload and confirmation stages against an already verified store.
    pub async fn execute(
        &self,
        plan: &MigrationPlan,
        store: &dyn BlobStore,
    ) -> Result<MigrationReport, MigrateError> {
        let summary = upload_state_files(store, &self.container, &plan.state_files).await;
        if !summary.is_success() {
            return Err(MigrateError::UploadFailed {
                total: summary.total(),
            });
        }
        output::print_upload_done();

        let confirmed = confirm_uploads(store, &self.container).await;

        let report = MigrationReport {
            total: summary.total(),
            uploaded: summary.succeeded(),
            failed: summary.failed(),
            confirmed,
        };
        tracing::info!(
            uploaded = report.uploaded,
            failed = report.failed,
            confirmed = report.confirmed,
            "migration finished"
        );
        output::print_report(&report);

        Ok(report)
    }
}
