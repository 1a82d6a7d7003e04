#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;
use tfstate_migrate::{BlobStore, RemoteBlob, StorageError};

pub fn setup_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn write_state(root: &Path, relative_dir: &str, contents: &[u8]) {
    let dir = root.join(relative_dir);
    fs::create_dir_all(&dir).expect("Failed to create state directory");
    fs::write(dir.join("terraform.tfstate"), contents).expect("Failed to write state file");
}

/// In-memory blob store with per-blob failure injection.
#[derive(Default)]
pub struct FakeStore {
    containers: Vec<String>,
    blobs: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    failing_blobs: HashSet<String>,
    fail_listing: bool,
    uploads: Mutex<usize>,
}

impl FakeStore {
    pub fn with_container(container: &str) -> Self {
        Self {
            containers: vec![container.to_string()],
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, blob_name: &str) -> Self {
        self.failing_blobs.insert(blob_name.to_string());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn insert(&self, container: &str, blob_name: &str, data: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert((container.to_string(), blob_name.to_string()), data.to_vec());
    }

    pub fn blob(&self, container: &str, blob_name: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(&(container.to_string(), blob_name.to_string()))
            .cloned()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn upload_attempts(&self) -> usize {
        *self.uploads.lock().unwrap()
    }

    fn check_container(&self, container: &str) -> Result<(), StorageError> {
        if self.containers.iter().any(|c| c == container) {
            Ok(())
        } else {
            Err(StorageError::ContainerNotFound(container.to_string()))
        }
    }
}

#[async_trait]
impl BlobStore for FakeStore {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_containers(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.containers.clone())
    }

    async fn container_exists(&self, container: &str) -> Result<(), StorageError> {
        self.check_container(container)
    }

    async fn upload(
        &self,
        container: &str,
        blob_name: &str,
        data: Vec<u8>,
    ) -> Result<(), StorageError> {
        *self.uploads.lock().unwrap() += 1;
        self.check_container(container)?;

        if self.failing_blobs.contains(blob_name) {
            return Err(StorageError::Azure(format!(
                "API error (500 InternalError): cannot write {}",
                blob_name
            )));
        }

        self.insert(container, blob_name, &data);
        Ok(())
    }

    async fn list_blobs(&self, container: &str) -> Result<Vec<RemoteBlob>, StorageError> {
        self.check_container(container)?;
        if self.fail_listing {
            return Err(StorageError::Azure("listing unavailable".to_string()));
        }

        Ok(self
            .blobs
            .lock()
            .unwrap()
            .iter()
            .filter(|((c, _), _)| c == container)
            .map(|((_, name), data)| RemoteBlob {
                name: name.clone(),
                size: data.len() as u64,
            })
            .collect())
    }
}
