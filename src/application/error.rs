//! Pipeline error taxonomy
//!
//! Every failure aborts the run. The variant records which phase failed so
//! the log line names it; nothing is uploaded after an error.

use thiserror::Error;

use crate::domain::events::PipelineStage;
use crate::infrastructure::parsing::ParsingError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("Extraction failed for {url}: {source}")]
    Extraction {
        url: String,
        #[source]
        source: ParsingError,
    },

    #[error("Merge failed: {message}")]
    Merge { message: String },

    #[error("Upload of {object_name} to bucket {bucket} failed: {source}")]
    Upload {
        bucket: String,
        object_name: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid pipeline configuration: {0}")]
    Configuration(String),
}

impl PipelineError {
    pub fn fetch(url: &str, source: impl Into<BoxError>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn extraction(url: &str, source: ParsingError) -> Self {
        Self::Extraction {
            url: url.to_string(),
            source,
        }
    }

    pub fn merge(message: impl Into<String>) -> Self {
        Self::Merge {
            message: message.into(),
        }
    }

    pub fn upload(bucket: &str, object_name: &str, source: impl Into<BoxError>) -> Self {
        Self::Upload {
            bucket: bucket.to_string(),
            object_name: object_name.to_string(),
            source: source.into(),
        }
    }

    /// Short label used in log lines and metrics keys
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch-error",
            Self::Extraction { .. } => "extraction-error",
            Self::Merge { .. } => "merge-error",
            Self::Upload { .. } => "upload-error",
            Self::Configuration(_) => "configuration-error",
        }
    }

    /// Phase that was running when the error occurred
    ///
    /// Fetch and extraction errors happen in both fetch phases, so the
    /// caller passes the stage it was in.
    pub fn phase_hint(&self, current: PipelineStage) -> PipelineStage {
        match self {
            Self::Merge { .. } => PipelineStage::Merging,
            Self::Upload { .. } => PipelineStage::Uploading,
            Self::Configuration(_) => PipelineStage::NotStarted,
            Self::Fetch { .. } | Self::Extraction { .. } => current,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
