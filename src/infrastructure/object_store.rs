//! Filesystem-backed object store
//!
//! Buckets are directories under a root; objects are files inside them.
//! Uploads copy into a sibling temp file and rename over the target so a
//! reader never sees a half-written object.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use crate::domain::services::ObjectStorage;

/// Object store persisting to `<root>/<bucket>/<object_name>`
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Final path of an object
    pub fn object_path(&self, bucket: &str, object_name: &str) -> Result<PathBuf> {
        for (what, value) in [("bucket", bucket), ("object name", object_name)] {
            if value.is_empty() || value.contains(['/', '\\']) || value == "." || value == ".." {
                anyhow::bail!("Invalid {what}: {value:?}");
            }
        }
        Ok(self.root.join(bucket).join(object_name))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStore {
    async fn upload(&self, bucket: &str, object_name: &str, file_path: &Path) -> Result<()> {
        let target = self.object_path(bucket, object_name)?;
        let bucket_dir = self.root.join(bucket);

        fs::create_dir_all(&bucket_dir).await
            .with_context(|| format!("Failed to create bucket directory: {}", bucket_dir.display()))?;

        let staging = bucket_dir.join(format!(".{object_name}.partial"));
        let bytes = fs::copy(file_path, &staging).await
            .with_context(|| format!("Failed to stage {} into bucket {bucket}", file_path.display()))?;

        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e).with_context(|| format!("Failed to store object {object_name} in bucket {bucket}"));
        }

        info!("Stored object {}/{} ({} bytes) at {}", bucket, object_name, bytes, target.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_upload_creates_bucket_and_replaces_existing_object() -> Result<()> {
        let root = tempdir()?;
        let store = LocalObjectStore::new(root.path());
        let source_dir = tempdir()?;
        let source = source_dir.path().join("payload.json");

        std::fs::write(&source, b"[1]")?;
        store.upload("scrapes", "phones_2024-01-01.json", &source).await?;
        std::fs::write(&source, b"[2]")?;
        store.upload("scrapes", "phones_2024-01-01.json", &source).await?;

        let stored = std::fs::read(root.path().join("scrapes").join("phones_2024-01-01.json"))?;
        assert_eq!(stored, b"[2]");
        assert!(!root.path().join("scrapes").join(".phones_2024-01-01.json.partial").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_source_file_fails() {
        let root = tempdir().unwrap();
        let store = LocalObjectStore::new(root.path());
        let result = store.upload("scrapes", "x.json", Path::new("/definitely/not/here.json")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_path_traversal_is_rejected() {
        let store = LocalObjectStore::new("/tmp/store");
        assert!(store.object_path("..", "x.json").is_err());
        assert!(store.object_path("scrapes", "../x.json").is_err());
        assert!(store.object_path("scrapes", "x.json").is_ok());
    }
}
