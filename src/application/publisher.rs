//! Publish stage: serialize the merged dataset and hand it to storage

use chrono::NaiveDate;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

use super::error::{PipelineError, PipelineResult};
use crate::domain::dataset::MergedDataset;
use crate::domain::services::ObjectStorage;

/// Object name for a run date: `<prefix>_<YYYY-MM-DD>.json`
pub fn upload_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.json", date.format("%Y-%m-%d"))
}

/// What was published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub bucket: String,
    pub object_name: String,
    pub bytes: usize,
    /// blake3 hex digest of the uploaded payload
    pub digest: String,
}

pub struct Publisher {
    storage: Arc<dyn ObjectStorage>,
    bucket: String,
}

impl Publisher {
    pub fn new(storage: Arc<dyn ObjectStorage>, bucket: impl Into<String>) -> Self {
        Self {
            storage,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Write the dataset to a scratch file and upload it as `object_name`
    ///
    /// The scratch file is removed whether or not the upload succeeds.
    pub async fn publish(&self, dataset: &MergedDataset, object_name: &str) -> PipelineResult<UploadReceipt> {
        let payload = dataset
            .to_json_bytes()
            .map_err(|e| PipelineError::upload(&self.bucket, object_name, e))?;

        let mut scratch = tempfile::Builder::new()
            .prefix("handset-scraper-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| PipelineError::upload(&self.bucket, object_name, e))?;
        scratch
            .write_all(&payload)
            .and_then(|_| scratch.flush())
            .map_err(|e| PipelineError::upload(&self.bucket, object_name, e))?;
        debug!("Wrote {} bytes to scratch file {}", payload.len(), scratch.path().display());

        let result = self.storage.upload(&self.bucket, object_name, scratch.path()).await;
        drop(scratch);
        result.map_err(|e| PipelineError::upload(&self.bucket, object_name, e))?;

        let digest = blake3::hash(&payload).to_hex().to_string();
        info!("📤 Uploaded {} ({} bytes) to bucket {}", object_name, payload.len(), self.bucket);

        Ok(UploadReceipt {
            bucket: self.bucket.clone(),
            object_name: object_name.to_string(),
            bytes: payload.len(),
            digest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStorage {
        seen: Mutex<Vec<(String, String, PathBuf, Vec<u8>)>>,
        fail: bool,
    }

    #[async_trait]
    impl ObjectStorage for RecordingStorage {
        async fn upload(&self, bucket: &str, object_name: &str, file_path: &Path) -> anyhow::Result<()> {
            let bytes = std::fs::read(file_path)?;
            self.seen.lock().unwrap().push((
                bucket.to_string(),
                object_name.to_string(),
                file_path.to_path_buf(),
                bytes,
            ));
            if self.fail {
                anyhow::bail!("bucket unavailable");
            }
            Ok(())
        }
    }

    fn dataset() -> MergedDataset {
        let mut record = serde_json::Map::new();
        record.insert("brand".to_string(), "Apple".into());
        record.insert("link".to_string(), "https://shop/a".into());
        MergedDataset {
            columns: vec!["brand".to_string(), "link".to_string()],
            records: vec![record],
            fanned_out_links: Vec::new(),
        }
    }

    #[test]
    fn test_upload_name() {
        let date = NaiveDate::from_ymd_opt(2021, 10, 5).unwrap();
        assert_eq!(upload_name("o2_phones", date), "o2_phones_2021-10-05.json");
    }

    #[tokio::test]
    async fn test_publish_uploads_json_and_cleans_up() {
        let storage = Arc::new(RecordingStorage::default());
        let publisher = Publisher::new(storage.clone(), "phones");

        let receipt = publisher.publish(&dataset(), "o2_phones_2021-10-05.json").await.unwrap();

        let seen = storage.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (bucket, name, path, bytes) = &seen[0];
        assert_eq!(bucket, "phones");
        assert_eq!(name, "o2_phones_2021-10-05.json");
        assert_eq!(bytes.as_slice(), br#"[{"brand":"Apple","link":"https://shop/a"}]"#);
        assert!(!path.exists());

        assert_eq!(receipt.bytes, bytes.len());
        assert_eq!(receipt.digest, blake3::hash(bytes).to_hex().to_string());
    }

    #[tokio::test]
    async fn test_failed_upload_is_upload_error_and_cleans_up() {
        let storage = Arc::new(RecordingStorage {
            fail: true,
            ..Default::default()
        });
        let publisher = Publisher::new(storage.clone(), "phones");

        let err = publisher.publish(&dataset(), "x.json").await.unwrap_err();
        assert_eq!(err.kind(), "upload-error");

        let seen = storage.seen.lock().unwrap();
        assert!(!seen[0].2.exists());
    }
}
