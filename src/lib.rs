//! tfstate-migrate - Terraform state migration to Azure Blob Storage
//!
//! Finds local `terraform.tfstate` files, uploads them to a blob container
//! under their relative directory, and confirms the result by listing the
//! container.

pub mod migrate;
pub mod output;
pub mod remote;
pub mod storage;
pub mod terraform;

mod error;

pub use error::MigrateError;
pub use migrate::{Migration, MigrationPlan, MigrationReport, UploadOutcome, UploadSummary};
pub use remote::RemoteBlob;
pub use storage::azure::{AzureBlobClient, AzureError, ConnectionString};
pub use storage::{BlobStore, StorageError};
pub use terraform::StateFile;
