//! Pipeline lifecycle states

use serde::{Deserialize, Serialize};

/// Stage of a scrape run
///
/// Runs move strictly forward; any failure jumps to `Failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PipelineStage {
    NotStarted,
    FetchingListings,
    FetchingDetails,
    Merging,
    Uploading,
    Done,
    Failed,
}

impl PipelineStage {
    /// Next stage on success; terminal stages stay where they are
    pub fn advance(self) -> Self {
        match self {
            PipelineStage::NotStarted => PipelineStage::FetchingListings,
            PipelineStage::FetchingListings => PipelineStage::FetchingDetails,
            PipelineStage::FetchingDetails => PipelineStage::Merging,
            PipelineStage::Merging => PipelineStage::Uploading,
            PipelineStage::Uploading | PipelineStage::Done => PipelineStage::Done,
            PipelineStage::Failed => PipelineStage::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::NotStarted => write!(f, "not started"),
            PipelineStage::FetchingListings => write!(f, "fetching listings"),
            PipelineStage::FetchingDetails => write!(f, "fetching details"),
            PipelineStage::Merging => write!(f, "merging"),
            PipelineStage::Uploading => write!(f, "uploading"),
            PipelineStage::Done => write!(f, "done"),
            PipelineStage::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_advance_linearly() {
        let mut stage = PipelineStage::NotStarted;
        let mut seen = vec![stage];
        while !stage.is_terminal() {
            stage = stage.advance();
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                PipelineStage::NotStarted,
                PipelineStage::FetchingListings,
                PipelineStage::FetchingDetails,
                PipelineStage::Merging,
                PipelineStage::Uploading,
                PipelineStage::Done,
            ]
        );
    }

    #[test]
    fn test_failed_is_terminal() {
        assert!(PipelineStage::Failed.is_terminal());
        assert_eq!(PipelineStage::Failed.advance(), PipelineStage::Failed);
    }
}
