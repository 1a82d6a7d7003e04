mod client;
mod connection_string;
mod error;
mod signing;
mod types;

pub use client::AzureBlobClient;
pub use connection_string::{AccountCredential, ConnectionString};
pub use error::AzureError;

use async_trait::async_trait;

use super::{BlobStore, StorageError};
use crate::remote::RemoteBlob;

#[async_trait]
impl BlobStore for AzureBlobClient {
    fn name(&self) -> &str {
        "azure"
    }

    async fn list_containers(&self) -> Result<Vec<String>, StorageError> {
        Ok(AzureBlobClient::list_containers(self).await?)
    }

    async fn container_exists(&self, container: &str) -> Result<(), StorageError> {
        self.get_container_properties(container).await?;
        tracing::debug!(container, "container properties fetched");
        Ok(())
    }

    async fn upload(
        &self,
        container: &str,
        blob_name: &str,
        data: Vec<u8>,
    ) -> Result<(), StorageError> {
        Ok(self.put_blob(container, blob_name, data).await?)
    }

    async fn list_blobs(&self, container: &str) -> Result<Vec<RemoteBlob>, StorageError> {
        Ok(AzureBlobClient::list_blobs(self, container).await?)
    }
}
