// src/providers/mod.rs

use async_trait::async_trait;
use std::collections::BTreeMap;

pub use crate::error::FetchError;

/// Response headers keyed by lowercased name. Repeated headers are joined
/// with ", ".
pub type ResponseHeaders = BTreeMap<String, String>;

/// Everything the check catalog needs from the single page fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchedPage {
    pub body: String,
    /// Decoded body length before any lossy UTF-8 replacement.
    pub body_bytes: usize,
    pub status: u16,
    pub headers: ResponseHeaders,
    /// Request start to body fully read.
    pub elapsed_ms: u64,
}

impl FetchedPage {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    fn fetcher_name(&self) -> &str;

    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

// Module declarations
pub mod http;
pub mod mocks;

pub use http::HttpFetcher;
pub use mocks::MockFetcher;
