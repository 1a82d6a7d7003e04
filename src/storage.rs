pub mod azure;

use async_trait::async_trait;
use thiserror::Error;

use crate::remote::RemoteBlob;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid connection string: {0}")]
    InvalidConnectionString(String),
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("container not found: '{0}'")]
    ContainerNotFound(String),
    #[error("azure error: {0}")]
    Azure(String),
}

/// The blob operations the migration pipeline relies on.
#[async_trait]
pub trait BlobStore: Send + Sync {
    fn name(&self) -> &str;
    async fn list_containers(&self) -> Result<Vec<String>, StorageError>;
    async fn container_exists(&self, container: &str) -> Result<(), StorageError>;
    /// Overwrites any existing blob with the same name.
    async fn upload(
        &self,
        container: &str,
        blob_name: &str,
        data: Vec<u8>,
    ) -> Result<(), StorageError>;
    async fn list_blobs(&self, container: &str) -> Result<Vec<RemoteBlob>, StorageError>;
}

pub fn connect(connection_string: &str) -> Result<Box<dyn BlobStore>, StorageError> {
    let client = azure::AzureBlobClient::from_connection_string(connection_string)?;
    tracing::debug!(endpoint = %client.endpoint(), "blob client created");
    Ok(Box::new(client))
}
