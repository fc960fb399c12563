//! Domain module - catalog entities and collaborator interfaces
//!
//! Listing summaries, specification tables, the merged dataset and the
//! traits the pipeline is wired with.

pub mod dataset;
pub mod events;
pub mod product;
pub mod services;
pub mod spec_table;

// Re-export commonly used items
pub use dataset::{MergedDataset, MergedRecord};
pub use events::PipelineStage;
pub use product::{ContractType, ListingHarvest, ProductSummary};
pub use services::{Clock, ObjectStorage, PageFetcher};
pub use spec_table::{DetailTable, RawTable, SpecFrame};
