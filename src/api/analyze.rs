use std::net::IpAddr;
use std::time::Instant;

use tracing::{debug, info, warn};
use url::{Host, Url};

use crate::checks::{run_catalog, PageContext};
use crate::document::Document;
use crate::error::{AnalyzeError, ValidationError};
use crate::providers::{FetchedPage, PageFetcher};
use crate::scoring::{assemble_weighted, CategoryWeights};
use crate::types::*;

/// Parses and vets a user-supplied URL. Runs before any network call.
pub fn validate_url(input: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(input.trim()).map_err(|e| ValidationError::Malformed {
        url: input.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedScheme(url.scheme().to_string()));
    }

    match url.host() {
        None => return Err(ValidationError::MissingHost),
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            if domain == "localhost" || domain.ends_with(".localhost") {
                return Err(ValidationError::DisallowedHost(domain));
            }
        }
        Some(Host::Ipv4(ip)) => reject_local_ip(IpAddr::V4(ip))?,
        Some(Host::Ipv6(ip)) => reject_local_ip(IpAddr::V6(ip))?,
    }

    Ok(url)
}

/// IPv6 hosts are also checked through their embedded IPv4 address, so
/// `[::ffff:127.0.0.1]` is refused like `127.0.0.1`.
fn reject_local_ip(ip: IpAddr) -> Result<(), ValidationError> {
    let embedded = match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().or_else(|| v6.to_ipv4()).map(IpAddr::V4),
        IpAddr::V4(_) => None,
    };
    let is_local = |ip: IpAddr| ip.is_loopback() || ip.is_unspecified();

    if is_local(ip) || embedded.is_some_and(is_local) {
        return Err(ValidationError::DisallowedHost(ip.to_string()));
    }
    Ok(())
}

/// Runs the whole check catalog over an already fetched page.
///
/// The parsed document lives only inside this call, so nothing non-`Send`
/// ever crosses an await point in `analyze`.
pub fn evaluate_page(url: &Url, page: &FetchedPage) -> Report {
    evaluate_page_weighted(url, page, &CategoryWeights::default())
}

pub fn evaluate_page_weighted(url: &Url, page: &FetchedPage, weights: &CategoryWeights) -> Report {
    let document = Document::parse(&page.body);
    let ctx = PageContext {
        url,
        document: &document,
        html: &page.body,
        body_bytes: page.body_bytes,
        headers: &page.headers,
        status: page.status,
        elapsed_ms: page.elapsed_ms,
    };

    let sections = run_catalog(&ctx);
    let report = assemble_weighted(url.as_str(), sections, weights);

    for category in Category::ALL {
        let section = report.section(category);
        debug!(
            category = category.key(),
            score = section.score,
            checks = section.checks.len(),
            "category scored"
        );
    }

    report
}

/// Validates, fetches once, and scores a single page.
pub async fn analyze<F>(url: &str, fetcher: &F) -> Result<Report, AnalyzeError>
where
    F: PageFetcher + ?Sized,
{
    analyze_with_weights(url, fetcher, &CategoryWeights::default()).await
}

pub async fn analyze_with_weights<F>(
    url: &str,
    fetcher: &F,
    weights: &CategoryWeights,
) -> Result<Report, AnalyzeError>
where
    F: PageFetcher + ?Sized,
{
    let target = validate_url(url).map_err(|e| {
        warn!(url, error = %e, "rejected url");
        e
    })?;

    let started = Instant::now();
    info!(url = %target, fetcher = fetcher.fetcher_name(), "starting analysis");

    let page = fetcher.fetch(target.as_str()).await.map_err(|e| {
        warn!(url = %target, error = %e, "fetch failed");
        e
    })?;
    debug!(
        url = %target,
        status = page.status,
        bytes = page.body_bytes,
        elapsed_ms = page.elapsed_ms,
        "page fetched"
    );

    let report = evaluate_page_weighted(&target, &page, weights);

    info!(
        url = %target,
        overall_score = report.overall_score,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::providers::mocks::{page, MockFetcher};
    use std::time::Duration;

    #[test]
    fn test_validate_url_accepts_public_hosts() {
        let url = validate_url("https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
        assert!(validate_url("  http://93.184.216.34/path?q=1 ").is_ok());
        assert!(validate_url("http://[::ffff:93.184.216.34]/").is_ok());
        assert!(validate_url("http://[2606:2800:220:1::1]/").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_local_hosts() {
        for input in [
            "http://localhost:3000/",
            "http://LOCALHOST/",
            "http://app.localhost/",
            "http://127.0.0.1/",
            "http://127.10.0.1:8080/",
            "http://[::1]/",
            "http://0.0.0.0/",
            "http://[::]/",
            "http://[::ffff:127.0.0.1]/",
            "http://[::ffff:7f00:1]/",
            "http://[::127.0.0.1]/",
        ] {
            assert!(
                matches!(validate_url(input), Err(ValidationError::DisallowedHost(_))),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_validate_url_rejects_malformed_and_schemes() {
        assert!(matches!(validate_url("not a url"), Err(ValidationError::Malformed { .. })));
        assert!(matches!(validate_url("http://"), Err(ValidationError::Malformed { .. })));
        assert!(matches!(
            validate_url("ftp://example.com/"),
            Err(ValidationError::UnsupportedScheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(ValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_evaluate_page_fills_every_category() {
        let url = Url::parse("https://example.com/").unwrap();
        let page = page("<html><head><title>Hi</title></head></html>", &[], 200, 100);
        let report = evaluate_page(&url, &page);

        assert_eq!(report.url, "https://example.com/");
        assert_eq!(report.schema_version, SCHEMA_VERSION);
        for category in Category::ALL {
            assert!(!report.section(category).checks.is_empty(), "{:?}", category);
            assert!(report.category_score(category) <= 100);
        }
    }

    #[test]
    fn test_evaluate_page_sizes_by_decoded_bytes() {
        let url = Url::parse("https://example.com/").unwrap();
        // 20KB of text that grew past 50KB when invalid bytes were replaced.
        let mut fetched = page(&"\u{fffd}".repeat(20 * 1024), &[], 200, 100);
        fetched.body_bytes = 20 * 1024;

        let report = evaluate_page(&url, &fetched);
        let size = report.find_check(Category::Performance, "Page Size").unwrap();
        assert!(size.passed, "{}", size.description);
        assert_eq!(size.description, "Small: 20.0KB");
    }

    #[tokio::test]
    async fn test_analyze_uses_normalized_url() {
        let fetcher = MockFetcher::new("test").with_html(
            "https://example.com/",
            "<title>Example</title>",
            &[],
            80,
        );

        let report = analyze("https://example.com", &fetcher).await.unwrap();
        assert_eq!(report.url, "https://example.com/");
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_analyze_rejects_before_fetching() {
        let fetcher = MockFetcher::new("test");
        let err = analyze("http://localhost:3000/", &fetcher).await.unwrap_err();

        assert!(matches!(err, AnalyzeError::Validation(_)));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_propagates_fetch_errors() {
        let fetcher = MockFetcher::new("test")
            .with_error("https://slow.example/", FetchError::Timeout(Duration::from_secs(15)));

        let err = analyze("https://slow.example/", &fetcher).await.unwrap_err();
        assert_eq!(err, AnalyzeError::Fetch(FetchError::Timeout(Duration::from_secs(15))));
        assert_eq!(err.kind(), "fetch");
    }

    #[tokio::test]
    async fn test_analyze_works_through_trait_object() {
        let fetcher: Box<dyn PageFetcher> = Box::new(
            MockFetcher::new("boxed").with_html("https://example.org/", "<p>hi</p>", &[], 10),
        );
        let report = analyze("https://example.org/", fetcher.as_ref()).await.unwrap();
        assert_eq!(report.url, "https://example.org/");
    }
}
