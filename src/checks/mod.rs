// src/checks/mod.rs
//
// The check catalog. Every check is a pure function of `PageContext` and
// returns exactly one `CheckResult`; no check reads another check's output.
// Within a category, checks run in the order listed in that module's `run`.

pub mod seo;
pub mod performance;
pub mod security;
pub mod mobile;
pub mod usability;
pub mod technologies;
pub mod social;

use url::Url;

use crate::document::Document;
use crate::providers::ResponseHeaders;
use crate::types::{Category, CheckResult};

/// Everything a check may look at.
pub struct PageContext<'a> {
    pub url: &'a Url,
    pub document: &'a Document,
    /// Fetched body as text, for substring scans.
    pub html: &'a str,
    /// Decoded body length in bytes, before UTF-8 replacement.
    pub body_bytes: usize,
    pub headers: &'a ResponseHeaders,
    pub status: u16,
    pub elapsed_ms: u64,
}

impl<'a> PageContext<'a> {
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn html_size(&self) -> usize {
        self.body_bytes
    }

    pub fn hostname(&self) -> &'a str {
        self.url.host_str().unwrap_or_default()
    }
}

pub fn run_category(category: Category, ctx: &PageContext<'_>) -> Vec<CheckResult> {
    match category {
        Category::Seo => seo::run(ctx),
        Category::Performance => performance::run(ctx),
        Category::Security => security::run(ctx),
        Category::Mobile => mobile::run(ctx),
        Category::Usability => usability::run(ctx),
        Category::Technologies => technologies::run(ctx),
        Category::Social => social::run(ctx),
    }
}

/// Runs every category in declaration order.
pub fn run_catalog(ctx: &PageContext<'_>) -> Vec<(Category, Vec<CheckResult>)> {
    Category::ALL
        .iter()
        .map(|&category| (category, run_category(category, ctx)))
        .collect()
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::*;

    /// Owns the inputs a `PageContext` borrows.
    pub struct Fixture {
        pub url: Url,
        pub document: Document,
        pub html: String,
        pub body_bytes: usize,
        pub headers: ResponseHeaders,
        pub status: u16,
        pub elapsed_ms: u64,
    }

    impl Fixture {
        pub fn new(url: &str, html: &str) -> Self {
            Self {
                url: Url::parse(url).unwrap(),
                document: Document::parse(html),
                html: html.to_string(),
                body_bytes: html.len(),
                headers: ResponseHeaders::new(),
                status: 200,
                elapsed_ms: 100,
            }
        }

        pub fn html(html: &str) -> Self {
            Self::new("https://example.com/", html)
        }

        pub fn header(mut self, name: &str, value: &str) -> Self {
            self.headers.insert(name.to_ascii_lowercase(), value.to_string());
            self
        }

        pub fn body_bytes(mut self, body_bytes: usize) -> Self {
            self.body_bytes = body_bytes;
            self
        }

        pub fn status(mut self, status: u16) -> Self {
            self.status = status;
            self
        }

        pub fn elapsed(mut self, elapsed_ms: u64) -> Self {
            self.elapsed_ms = elapsed_ms;
            self
        }

        pub fn ctx(&self) -> PageContext<'_> {
            PageContext {
                url: &self.url,
                document: &self.document,
                html: &self.html,
                body_bytes: self.body_bytes,
                headers: &self.headers,
                status: self.status,
                elapsed_ms: self.elapsed_ms,
            }
        }
    }
}
