use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{FetchError, FetchedPage, PageFetcher, ResponseHeaders};

/// Serves canned pages and errors; counts every fetch attempt.
pub struct MockFetcher {
    pub name: String,
    pub pages: HashMap<String, FetchedPage>,
    pub errors: HashMap<String, FetchError>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pages: HashMap::new(),
            errors: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_page(mut self, url: &str, page: FetchedPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Shorthand for a page with the given html, headers and timing.
    pub fn with_html(
        self,
        url: &str,
        html: &str,
        headers: &[(&str, &str)],
        elapsed_ms: u64,
    ) -> Self {
        let page = page(html, headers, 200, elapsed_ms);
        self.with_page(url, page)
    }

    pub fn with_error(mut self, url: &str, error: FetchError) -> Self {
        self.errors.insert(url.to_string(), error);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Builds a `FetchedPage` with lowercased header names.
pub fn page(html: &str, headers: &[(&str, &str)], status: u16, elapsed_ms: u64) -> FetchedPage {
    let headers: ResponseHeaders = headers
        .iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
        .collect();
    FetchedPage {
        body: html.to_string(),
        body_bytes: html.len(),
        status,
        headers,
        elapsed_ms,
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    fn fetcher_name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.errors.get(url) {
            return Err(err.clone());
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Network(format!("no mock response for {}", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_mock_serves_pages_and_counts_calls() {
        let fetcher = MockFetcher::new("test")
            .with_html("https://a.test/", "<title>A</title>", &[("Server", "nginx")], 120)
            .with_error("https://slow.test/", FetchError::Timeout(Duration::from_secs(15)));

        let page = fetcher.fetch("https://a.test/").await.unwrap();
        assert_eq!(page.header("server"), Some("nginx"));
        assert_eq!(page.elapsed_ms, 120);

        let err = fetcher.fetch("https://slow.test/").await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));

        let missing = fetcher.fetch("https://unknown.test/").await;
        assert!(matches!(missing, Err(FetchError::Network(_))));

        assert_eq!(fetcher.call_count(), 3);
    }
}
