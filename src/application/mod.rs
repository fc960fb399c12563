//! Application layer - the scrape run and its stages
//!
//! Each stage is its own service; `pipeline` runs them in order and turns
//! the first failure into a `PipelineError`.

pub mod detail_fetcher;
pub mod error;
pub mod listing_fetcher;
pub mod merger;
pub mod pipeline;
pub mod publisher;

// Re-export commonly used items
pub use detail_fetcher::DetailTableFetcher;
pub use error::{PipelineError, PipelineResult};
pub use listing_fetcher::ListingFetcher;
pub use merger::merge;
pub use pipeline::{PipelineReport, ScrapePipeline, run_pipeline};
pub use publisher::{Publisher, UploadReceipt, upload_name};
