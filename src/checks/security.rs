use super::PageContext;
use crate::types::*;

pub const HTTPS: CheckMeta = CheckMeta::new("SSL/HTTPS", Impact::High, Difficulty::Hard);
pub const HSTS: CheckMeta = CheckMeta::new("HSTS", Impact::Medium, Difficulty::Hard)
    .learn_more("https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Strict-Transport-Security");
pub const FRAME_OPTIONS: CheckMeta = CheckMeta::new("X-Frame-Options", Impact::Medium, Difficulty::Medium)
    .learn_more("https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/X-Frame-Options");
pub const CONTENT_TYPE_OPTIONS: CheckMeta =
    CheckMeta::new("X-Content-Type-Options", Impact::Low, Difficulty::Easy)
        .learn_more("https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/X-Content-Type-Options");

pub fn run(ctx: &PageContext<'_>) -> Vec<CheckResult> {
    vec![
        check_https(ctx),
        check_hsts(ctx),
        check_frame_options(ctx),
        check_content_type_options(ctx),
    ]
}

pub fn check_https(ctx: &PageContext<'_>) -> CheckResult {
    if ctx.url.scheme() == "https" {
        HTTPS
            .result(true, 100, "Secure connection used.")
            .explain("HTTPS encrypts traffic between the browser and your server.")
            .fix("Your site is secure.")
    } else {
        HTTPS
            .result(false, 0, "Insecure connection (HTTP)")
            .explain("Browsers flag plain HTTP pages as 'Not Secure' and search engines rank them lower.")
            .fix("Install a free certificate from **Let's Encrypt**, or put the site behind a proxy such as **Cloudflare** that terminates TLS for you.")
            .recommend("Enable HTTPS.")
    }
}

pub fn check_hsts(ctx: &PageContext<'_>) -> CheckResult {
    match ctx.header("strict-transport-security") {
        Some(value) => HSTS
            .result(true, 100, "HSTS header present.")
            .explain("HSTS tells browsers to only use HTTPS for this site, preventing downgrade attacks.")
            .fix("Configuration is good.")
            .detail(value),
        None => HSTS
            .result(false, 0, "HSTS header missing")
            .explain("HTTP Strict Transport Security hardens your TLS setup.")
            .fix("Add this header to your server responses:\n`Strict-Transport-Security: max-age=31536000; includeSubDomains`")
            .recommend("Enable HSTS."),
    }
}

pub fn check_frame_options(ctx: &PageContext<'_>) -> CheckResult {
    match ctx.header("x-frame-options") {
        Some(value) => FRAME_OPTIONS
            .result(true, 100, "Clickjacking protection present.")
            .explain("This header stops other sites from embedding yours in an iframe.")
            .fix("Site is protected against clickjacking.")
            .detail(value),
        None => FRAME_OPTIONS
            .result(false, 0, "Clickjacking protection missing")
            .explain("Without this header, a malicious site could embed yours to trick users into clicking.")
            .fix("Add this header:\n`X-Frame-Options: SAMEORIGIN`")
            .recommend("Add X-Frame-Options header."),
    }
}

pub fn check_content_type_options(ctx: &PageContext<'_>) -> CheckResult {
    match ctx.header("x-content-type-options") {
        Some(value) => CONTENT_TYPE_OPTIONS
            .result(true, 100, "MIME sniffing protection present.")
            .explain("Stops browsers from interpreting files as a different MIME type than declared.")
            .fix("Configuration is correct.")
            .detail(value),
        None => CONTENT_TYPE_OPTIONS
            .result(false, 0, "MIME sniffing protection missing")
            .explain("This header reduces exposure to drive-by downloads and MIME confusion attacks.")
            .fix("Add this header:\n`X-Content-Type-Options: nosniff`")
            .recommend("Add X-Content-Type-Options header."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixture::Fixture;

    #[test]
    fn test_https_scheme() {
        let fixture = Fixture::new("https://example.com/", "");
        let result = check_https(&fixture.ctx());
        assert!(result.passed);
        assert_eq!(result.score, 100);

        let fixture = Fixture::new("http://example.com/", "");
        let result = check_https(&fixture.ctx());
        assert!(!result.passed);
        assert_eq!(result.score, 0);
        assert_eq!(result.impact, Impact::High);
    }

    #[test]
    fn test_security_headers_present() {
        let fixture = Fixture::html("")
            .header("Strict-Transport-Security", "max-age=63072000")
            .header("X-Frame-Options", "DENY")
            .header("X-Content-Type-Options", "nosniff");
        let results = run(&fixture.ctx());

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.passed && r.score == 100));
        assert_eq!(results[1].details, vec!["max-age=63072000".to_string()]);
    }

    #[test]
    fn test_security_headers_missing() {
        let fixture = Fixture::html("");
        let ctx = fixture.ctx();

        for result in [check_hsts(&ctx), check_frame_options(&ctx), check_content_type_options(&ctx)] {
            assert!(!result.passed, "{}", result.title);
            assert_eq!(result.score, 0);
            assert!(result.remediation().is_some());
        }
    }
}
