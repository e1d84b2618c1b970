// src/lib.rs

pub mod types;
pub mod error;
pub mod config;
pub mod document;
pub mod providers;
pub mod checks;
pub mod scoring;
pub mod api;
pub mod store;
pub mod server;
pub mod cli;

// Re-export commonly used types
pub use types::*;
pub use error::{AnalyzeError, FetchError, StoreError, ValidationError};
pub use config::FetchConfig;
pub use providers::{FetchedPage, HttpFetcher, PageFetcher};
pub use scoring::{aggregate_score, CategoryWeights};
pub use api::{analyze, evaluate_page, validate_url};
pub use store::{MemoryStore, ReportStore, StoredReport};
