use super::PageContext;
use crate::types::*;

pub const RESPONSE_TIME: CheckMeta =
    CheckMeta::new("Server Response Time", Impact::High, Difficulty::Hard)
        .learn_more("https://web.dev/articles/ttfb");
pub const PAGE_SIZE: CheckMeta = CheckMeta::new("Page Size", Impact::Medium, Difficulty::Medium);
pub const MINIFICATION: CheckMeta = CheckMeta::new("Asset Minification", Impact::Medium, Difficulty::Medium);
pub const COMPRESSION: CheckMeta = CheckMeta::new("Compression", Impact::High, Difficulty::Hard);

const FAST_MS: u64 = 500;
const ACCEPTABLE_MS: u64 = 1000;
const SMALL_BYTES: usize = 50 * 1024;
const LARGE_BYTES: usize = 150 * 1024;
const MAX_LISTED_ASSETS: usize = 5;

pub fn run(ctx: &PageContext<'_>) -> Vec<CheckResult> {
    vec![
        check_response_time(ctx),
        check_page_size(ctx),
        check_minification(ctx),
        check_compression(ctx),
    ]
}

pub fn check_response_time(ctx: &PageContext<'_>) -> CheckResult {
    let ms = ctx.elapsed_ms;

    if ms < FAST_MS {
        RESPONSE_TIME
            .result(true, 100, format!("Fast: {}ms", ms))
            .explain("Response time is a key metric for user experience and SEO.")
            .fix("Great job! Keep monitoring response times.")
    } else if ms < ACCEPTABLE_MS {
        RESPONSE_TIME
            .result(false, 75, format!("Acceptable: {}ms", ms))
            .explain("Response time is acceptable but could be better.")
            .fix("Optimize database queries, add page caching, or upgrade your hosting plan.")
    } else {
        RESPONSE_TIME
            .result(false, 0, format!("Slow: {}ms", ms))
            .explain("Slow server responses frustrate users and hurt rankings.")
            .fix("Enable page caching, optimize backend code, use a CDN, or upgrade server resources.")
            .recommend("Optimize server backend or use caching.")
    }
}

pub fn check_page_size(ctx: &PageContext<'_>) -> CheckResult {
    let bytes = ctx.html_size();
    let kb = bytes as f64 / 1024.0;

    if bytes < SMALL_BYTES {
        PAGE_SIZE
            .result(true, 100, format!("Small: {:.1}KB", kb))
            .explain("Smaller pages load faster and use less data.")
            .fix("Excellent work keeping page size down.")
    } else if bytes < LARGE_BYTES {
        PAGE_SIZE
            .result(false, 80, format!("Medium: {:.1}KB", kb))
            .explain("Page size is reasonable.")
            .fix("Monitor size as you add more content.")
    } else {
        PAGE_SIZE
            .result(false, 0, format!("Large: {:.1}KB", kb))
            .explain("Large HTML documents take longer to download and parse.")
            .fix("Minify HTML, move inline CSS/JS into cached files, and remove unused markup.")
            .recommend("Minify HTML/CSS/JS.")
    }
}

/// Heuristic: a script or stylesheet URL without `.min.` that does not look
/// like it comes from a CDN is probably served unminified.
pub fn check_minification(ctx: &PageContext<'_>) -> CheckResult {
    let scripts = ctx.document.attr_values("script[src]", "src");
    let stylesheets: Vec<String> = ctx
        .document
        .find_by_attr("link", "rel", |rel| {
            rel.split_ascii_whitespace().any(|r| r.eq_ignore_ascii_case("stylesheet"))
        })
        .into_iter()
        .filter_map(|el| el.value().attr("href").map(str::to_string))
        .collect();

    let flagged: Vec<String> = scripts
        .into_iter()
        .filter(|src| is_unminified(src, ".js"))
        .chain(stylesheets.into_iter().filter(|href| is_unminified(href, ".css")))
        .collect();

    if flagged.is_empty() {
        MINIFICATION
            .result(true, 100, "All detected assets appear minified.")
            .explain("Minification strips whitespace and comments from code files to reduce their size.")
            .fix("Keep using build tools that minify your assets.")
    } else {
        MINIFICATION
            .result(false, 60, format!("{} assets potentially not minified.", flagged.len()))
            .explain("Minified files download faster.")
            .fix("If you use a bundler (Webpack, Vite), run its production `build` command, which minifies output.\nFor hand-written CSS/JS, run the files through a minifier before deploying.")
            .recommend("Minify your CSS and JS assets.")
            .with_details(flagged.into_iter().take(MAX_LISTED_ASSETS))
    }
}

fn is_unminified(asset_url: &str, extension: &str) -> bool {
    let lower = asset_url.to_ascii_lowercase();
    lower.contains(extension) && !lower.contains(".min.") && !lower.contains("cdn")
}

pub fn check_compression(ctx: &PageContext<'_>) -> CheckResult {
    let encoding = ctx
        .header("content-encoding")
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if encoding.contains("gzip") || encoding.contains("br") {
        COMPRESSION
            .result(true, 100, "Compression enabled.")
            .explain("Compression significantly reduces the size of files sent from your server.")
            .fix("Great! Gzip or Brotli is active.")
            .detail(format!("Content-Encoding: {}", encoding))
    } else {
        COMPRESSION
            .result(false, 0, "Compression not detected")
            .explain("Text resources (HTML, CSS, JS) should be compressed to save bandwidth. This is usually server configuration.")
            .fix("**Nginx:**\n```nginx\ngzip on;\ngzip_types text/plain text/css application/json application/javascript;\n```\n\n**Apache:**\n```apache\n<IfModule mod_deflate.c>\n  AddOutputFilterByType DEFLATE text/html text/plain text/xml text/css application/javascript\n</IfModule>\n```")
            .recommend("Enable Gzip/Brotli.")
    }
}
