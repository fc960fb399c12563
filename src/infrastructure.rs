//! Infrastructure layer for HTTP, HTML parsing, storage and process setup
//!
//! Concrete implementations of the domain collaborator traits plus
//! configuration loading and logging.

pub mod clock;
pub mod config;
pub mod http_client;
pub mod logging;
pub mod object_store;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use clock::{FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError, ConfigManager};
pub use http_client::HttpClient;
pub use logging::{get_log_directory, init_logging_with_config};
pub use object_store::LocalObjectStore;
pub use parsing::{ParsingConfig, ParsingError, ParsingResult, ProductListParser, SpecTableParser};
