//! handset-scraper - phone shop catalog scraper
//!
//! Fetches the O2 phone listings for every contract type, pulls the
//! specification table of each product, merges both into one dataset and
//! publishes it as a dated JSON object.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the run entry points for easier access
pub use application::{PipelineError, PipelineReport, ScrapePipeline, run_pipeline, upload_name};
