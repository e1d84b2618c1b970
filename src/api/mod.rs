// src/api/mod.rs

pub mod types;
pub mod analyze;

pub use types::{AnalyzeRequest, ErrorBody, ListQuery};
pub use analyze::{analyze, analyze_with_weights, evaluate_page, evaluate_page_weighted, validate_url};
