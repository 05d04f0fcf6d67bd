//! Filesystem-backed object store for raw and curated run payloads.
//!
//! Every key written by the pipeline is content-addressed: retries and
//! redeliveries always produce byte-identical payloads for the same key, so
//! the store only needs write-once semantics, not a general overwrite path.

pub mod error;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

pub use error::ObjectStoreError;

/// Content-addressed object store contract.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` at `key` unless something is already stored there.
    /// Returns `true` if this call created the object.
    async fn put_if_absent(&self, key: &str, bytes: &[u8]) -> Result<bool, ObjectStoreError>;

    /// Unconditionally write (or overwrite) `bytes` at `key`.
    ///
    /// Most keys this pipeline writes are content-addressed and only ever
    /// need [`ObjectStore::put_if_absent`], but the weekly rollup key
    /// (`curated/weekly/<week>/<model_id>.json`) is mutated every time a
    /// new run lands in that bucket, so it needs a real overwrite path.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), ObjectStoreError>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ObjectStoreError>;

    async fn exists(&self, key: &str) -> Result<bool, ObjectStoreError>;
}

/// Convenience JSON helpers built on top of [`ObjectStore`].
#[async_trait]
pub trait ObjectStoreJsonExt: ObjectStore {
    async fn put_json_if_absent<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<bool, ObjectStoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.put_if_absent(key, &bytes).await
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ObjectStoreError> {
        match self.get(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), ObjectStoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.put(key, &bytes).await
    }
}

impl<S: ObjectStore + ?Sized> ObjectStoreJsonExt for S {}

/// Hex-encoded SHA-256 digest of `bytes`, used to sanity-check that
/// redelivered writes are in fact byte-identical to the original.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Filesystem-backed [`ObjectStore`] rooted at a configured directory.
#[derive(Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        if key.split('/').any(|segment| segment == "..") {
            return Err(ObjectStoreError::Io {
                key: key.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "object keys must not contain '..' path segments",
                ),
            });
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put_if_absent(&self, key: &str, bytes: &[u8]) -> Result<bool, ObjectStoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| io_err(key, source))?;
        }

        let result = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;

        match result {
            Ok(mut file) => {
                use tokio::io::AsyncWriteExt;
                file.write_all(bytes)
                    .await
                    .map_err(|source| io_err(key, source))?;
                file.flush().await.map_err(|source| io_err(key, source))?;
                Ok(true)
            }
            Err(source) if source.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::debug!(key, "object already present, skipping write");
                Ok(false)
            }
            Err(source) => Err(io_err(key, source)),
        }
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), ObjectStoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| io_err(key, source))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| io_err(key, source))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ObjectStoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(io_err(key, source)),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, ObjectStoreError> {
        let path = self.resolve(key)?;
        Ok(tokio::fs::metadata(&path).await.is_ok())
    }
}

fn io_err(key: &str, source: std::io::Error) -> ObjectStoreError {
    ObjectStoreError::Io {
        key: key.to_string(),
        source,
    }
}

/// Fetch a required object, mapping a missing key to [`ObjectStoreError::NotFound`].
pub async fn get_required(
    store: &dyn ObjectStore,
    key: &str,
) -> Result<Vec<u8>, ObjectStoreError> {
    store
        .get(key)
        .await?
        .ok_or_else(|| ObjectStoreError::NotFound(key.to_string()))
}

/// Join a store root and key for diagnostics/log lines, without exposing
/// path traversal.
pub fn display_key(root: &Path, key: &str) -> String {
    root.join(key).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        value: u32,
    }

    #[tokio::test]
    async fn put_if_absent_returns_true_once_then_false_on_retry() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let first = store
            .put_if_absent("raw/runs/run-1/turn_000.json", b"{}")
            .await
            .unwrap();
        let second = store
            .put_if_absent("raw/runs/run-1/turn_000.json", b"{}")
            .await
            .unwrap();

        assert!(first);
        assert!(!second);
    }

    #[tokio::test]
    async fn get_returns_none_for_missing_key() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let result = store.get("curated/runs/nonexistent.json").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn json_round_trips_through_put_and_get() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        let sample = Sample { value: 42 };

        store
            .put_json_if_absent("manifests/m-1.json", &sample)
            .await
            .unwrap();
        let fetched: Sample = store
            .get_json("manifests/m-1.json")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched, sample);
    }

    #[tokio::test]
    async fn rejects_keys_with_path_traversal_segments() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let result = store.put_if_absent("../escape.json", b"{}").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn put_overwrites_an_existing_key() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        store
            .put_json("curated/weekly/2025-W45/model-1.json", &Sample { value: 1 })
            .await
            .unwrap();
        store
            .put_json("curated/weekly/2025-W45/model-1.json", &Sample { value: 2 })
            .await
            .unwrap();

        let fetched: Sample = store
            .get_json("curated/weekly/2025-W45/model-1.json")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.value, 2);
    }

    #[tokio::test]
    async fn exists_reflects_presence() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        assert!(!store.exists("curated/weekly/2025-W45/model.json").await.unwrap());
        store
            .put_if_absent("curated/weekly/2025-W45/model.json", b"{}")
            .await
            .unwrap();
        assert!(store.exists("curated/weekly/2025-W45/model.json").await.unwrap());
    }
}
