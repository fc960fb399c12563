//! Collaborator interfaces injected into the pipeline
//!
//! The pipeline never talks to the network, the object store or the wall
//! clock directly; it is handed implementations of these traits.

use async_trait::async_trait;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;

/// Fetches page bodies over HTTP
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the body; non-2xx statuses are errors
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Persists local files as named objects in a bucket
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store the bytes of `file_path` as `object_name`, replacing any existing object
    async fn upload(&self, bucket: &str, object_name: &str, file_path: &Path) -> Result<()>;
}

/// Source of the run date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
