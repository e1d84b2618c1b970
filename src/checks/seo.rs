use super::PageContext;
use crate::types::*;

pub const TITLE: CheckMeta = CheckMeta::new("Title Tag", Impact::High, Difficulty::Easy)
    .learn_more("https://developers.google.com/search/docs/appearance/title-link");
pub const META_DESCRIPTION: CheckMeta =
    CheckMeta::new("Meta Description", Impact::High, Difficulty::Easy)
        .learn_more("https://developers.google.com/search/docs/appearance/snippet");
pub const HEADINGS: CheckMeta = CheckMeta::new("Headings", Impact::Medium, Difficulty::Easy);
pub const CANONICAL: CheckMeta = CheckMeta::new("Canonical Tag", Impact::Medium, Difficulty::Medium)
    .learn_more("https://developers.google.com/search/docs/crawling-indexing/consolidate-duplicate-urls");
pub const ROBOTS: CheckMeta = CheckMeta::new("Robots Meta Tag", Impact::Medium, Difficulty::Easy);
pub const SITEMAP: CheckMeta = CheckMeta::new("Sitemap Link", Impact::Low, Difficulty::Easy);
pub const STRUCTURED_DATA: CheckMeta =
    CheckMeta::new("Structured Data", Impact::High, Difficulty::Hard)
        .learn_more("https://search.google.com/test/rich-results");
pub const IMAGE_ALT: CheckMeta = CheckMeta::new("Image Alt Attributes", Impact::Medium, Difficulty::Easy);
pub const LINKS: CheckMeta = CheckMeta::new("Link Analysis", Impact::Low, Difficulty::Medium);
pub const HTTP_STATUS: CheckMeta = CheckMeta::new("HTTP Status", Impact::High, Difficulty::Medium);

const TITLE_MIN: usize = 10;
const TITLE_MAX: usize = 60;
const DESCRIPTION_MIN: usize = 50;
const DESCRIPTION_MAX: usize = 160;

pub fn run(ctx: &PageContext<'_>) -> Vec<CheckResult> {
    vec![
        check_title(ctx),
        check_meta_description(ctx),
        check_headings(ctx),
        check_canonical(ctx),
        check_robots(ctx),
        check_sitemap_link(ctx),
        check_structured_data(ctx),
        check_image_alt(ctx),
        check_links(ctx),
        check_http_status(ctx),
    ]
}

pub fn check_title(ctx: &PageContext<'_>) -> CheckResult {
    let title = ctx.document.first_text("title").unwrap_or_default();
    let len = title.chars().count();

    if (TITLE_MIN..=TITLE_MAX).contains(&len) {
        TITLE
            .result(true, 100, format!("Perfect length: {} chars", len))
            .explain("The title tag is the most important on-page SEO element. It appears in search results and browser tabs.")
            .fix("You're doing great! Keep keywords near the front.")
            .detail(title)
    } else if len > 0 {
        TITLE
            .result(false, 60, format!("Length is {} chars ({}-{} recommended)", len, TITLE_MIN, TITLE_MAX))
            .explain("The title is the clickable headline in search results. Titles that are too long get truncated; titles that are too short waste the opportunity.")
            .fix("Update your HTML head:\n```html\n<head>\n  <title>Your Keyword - Your Brand</title>\n</head>\n```\nAim for 50-60 characters.")
            .recommend("Optimize title length.")
            .detail(title)
    } else {
        TITLE
            .result(false, 0, "Missing title tag")
            .explain("Without a title, search engines have to guess what the page is about and often show \"Untitled\" or unrelated text.")
            .fix("Add this inside your `<head>` tag:\n```html\n<title>Primary Keyword | Brand Name</title>\n```")
            .recommend("Add a descriptive title tag.")
    }
}

pub fn check_meta_description(ctx: &PageContext<'_>) -> CheckResult {
    let description = ctx.document.meta_name("description").unwrap_or_default();
    let len = description.chars().count();

    if (DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&len) {
        META_DESCRIPTION
            .result(true, 100, format!("Perfect length: {} chars", len))
            .explain("Meta descriptions summarize the page for search engines and users.")
            .fix("Excellent. Make sure it ends with a call-to-action to maximize clicks.")
            .detail(description)
    } else if len > 0 {
        META_DESCRIPTION
            .result(
                false,
                60,
                format!("Length is {} chars ({}-{} recommended)", len, DESCRIPTION_MIN, DESCRIPTION_MAX),
            )
            .explain("Descriptions under 50 characters are too vague; over 160 they get cut off in results.")
            .fix("Edit your page header:\n```html\n<meta name=\"description\" content=\"A brief, 160-character summary of your page content including keywords.\">\n```")
            .recommend("Optimize description length.")
            .detail(description)
    } else {
        META_DESCRIPTION
            .result(false, 0, "Missing meta description")
            .explain("Without a description, search engines pull arbitrary text from the page into the snippet.")
            .fix("Add this to your `<head>`:\n```html\n<meta name=\"description\" content=\"Buy the best widgets online. Free shipping on all orders.\">\n```")
            .recommend("Add a meta description to improve CTR.")
    }
}

pub fn check_headings(ctx: &PageContext<'_>) -> CheckResult {
    let h1s = ctx.document.elements("h1");

    if h1s.len() == 1 {
        let text: String = h1s[0].text().collect::<String>().trim().chars().take(50).collect();
        HEADINGS
            .result(true, 100, "Exactly one H1 tag found.")
            .explain("The H1 states the main topic of the page. Exactly one helps search engines identify the primary subject.")
            .fix("Perfect structure.")
            .detail(text)
    } else {
        HEADINGS
            .result(false, 50, format!("Found {} H1 tags", h1s.len()))
            .explain("A page should have exactly one H1 to signal its main topic. Multiple H1s dilute relevance.")
            .fix("1. Wrap your main title in `<h1>...</h1>`.\n2. Demote other headings to `<h2>`, `<h3>`, etc.")
            .recommend("Use exactly one H1 tag per page.")
            .detail(format!("Count: {}", h1s.len()))
    }
}

pub fn check_canonical(ctx: &PageContext<'_>) -> CheckResult {
    let canonical = ctx
        .document
        .find_by_attr_eq("link", "rel", "canonical")
        .into_iter()
        .find_map(|el| el.value().attr("href").map(|h| h.trim().to_string()))
        .filter(|h| !h.is_empty());

    match canonical {
        Some(href) => CANONICAL
            .result(true, 100, "Canonical tag is present.")
            .explain("A canonical tag names the main version of a page and prevents duplicate-content dilution.")
            .fix("Good job.")
            .detail(href),
        None => CANONICAL
            .result(false, 0, "Missing canonical tag")
            .explain("If the page is reachable over http, https, www and non-www, search engines may see four duplicate sites.")
            .fix("Add this to your `<head>`:\n```html\n<link rel=\"canonical\" href=\"https://example.com/current-page\" />\n```")
            .recommend("Add a canonical tag to prevent duplicate content."),
    }
}

/// Informational: passes whether or not the tag is present.
pub fn check_robots(ctx: &PageContext<'_>) -> CheckResult {
    match ctx.document.meta_name("robots").filter(|r| !r.is_empty()) {
        Some(robots) => ROBOTS
            .result(true, 100, format!("Robots meta tag found: {}", robots))
            .explain("The robots meta tag controls how search engines crawl and index the page.")
            .fix("Verify that the directives (index, follow) match your intentions."),
        None => ROBOTS
            .result(true, 100, "No robots meta tag (defaults to index, follow)")
            .explain("Without a robots meta tag, search engines index the page and follow its links.")
            .fix("No action needed unless you want to hide this page."),
    }
}

/// Soft signal: the sitemap may be declared in robots.txt, which is never
/// fetched, so a missing link passes with zero credit.
pub fn check_sitemap_link(ctx: &PageContext<'_>) -> CheckResult {
    let linked = ctx
        .document
        .find_by_attr("a", "href", |href| {
            let href = href.to_ascii_lowercase();
            href.contains("sitemap.xml") || href.contains("sitemap.html")
        })
        .into_iter()
        .next()
        .and_then(|el| el.value().attr("href").map(str::to_string));

    match linked {
        Some(href) => SITEMAP
            .result(true, 100, "Sitemap link found in HTML")
            .explain("Linking to a sitemap helps users and crawlers navigate the site.")
            .fix("Make sure the sitemap is also submitted to Google Search Console.")
            .detail(href),
        None => SITEMAP
            .result(true, 0, "No sitemap link found in HTML (check robots.txt)")
            .explain("A sitemap helps indexing. It is usually linked in the footer or declared in robots.txt.")
            .fix("Make sure robots.txt contains a line like:\n```\nSitemap: https://example.com/sitemap.xml\n```")
            .recommend("Ensure you have a sitemap.xml and it is referenced in your robots.txt."),
    }
}

pub fn check_structured_data(ctx: &PageContext<'_>) -> CheckResult {
    let blocks = ctx
        .document
        .find_by_attr_eq("script", "type", "application/ld+json")
        .len();

    if blocks > 0 {
        STRUCTURED_DATA
            .result(true, 100, "Schema.org (JSON-LD) detected.")
            .explain("Structured data helps search engines understand the content and can earn rich snippets.")
            .fix("Validate your schema with Google's Rich Results Test.")
            .detail(format!("JSON-LD blocks: {}", blocks))
    } else {
        STRUCTURED_DATA
            .result(false, 0, "No Schema.org data detected")
            .explain("Structured data gives search engines explicit clues about the meaning of a page.")
            .fix(format!(
                "Add a JSON-LD block:\n```html\n<script type=\"application/ld+json\">\n{{\n  \"@context\": \"https://schema.org\",\n  \"@type\": \"Organization\",\n  \"url\": \"{}\",\n  \"logo\": \"https://www.example.com/logo.png\"\n}}\n</script>\n```",
                ctx.url
            ))
            .recommend("Implement Schema.org structured data.")
    }
}

pub fn check_image_alt(ctx: &PageContext<'_>) -> CheckResult {
    let images = ctx.document.elements("img");
    let missing: Vec<String> = images
        .iter()
        .filter(|img| img.value().attr("alt").map_or(true, |alt| alt.trim().is_empty()))
        .map(|img| img.value().attr("src").unwrap_or("(no src)").to_string())
        .collect();

    if images.is_empty() {
        IMAGE_ALT
            .result(true, 100, "No images found.")
            .explain("Images enrich content, but having none is not an error.")
            .fix("Consider adding visual content.")
    } else if missing.is_empty() {
        IMAGE_ALT
            .result(true, 100, "All images have alt text.")
            .explain("Alt text describes images to search engines and screen readers.")
            .fix("Keep alt text descriptive and relevant.")
    } else {
        IMAGE_ALT
            .result(false, 0, format!("{} images missing alt text", missing.len()))
            .explain("Search engines cannot see images; they rely on the alt attribute for context.")
            .fix("Add an alt attribute to each `<img>`:\n```html\n<!-- Bad -->\n<img src=\"dog.jpg\">\n\n<!-- Good -->\n<img src=\"dog.jpg\" alt=\"A golden retriever playing fetch\">\n```")
            .recommend("Add alt text to all images.")
            .with_details(missing.into_iter().take(5))
    }
}

/// Informational link census. A link is internal when its href is
/// root-relative or mentions the page's own host.
pub fn check_links(ctx: &PageContext<'_>) -> CheckResult {
    let anchors = ctx.document.elements("a");
    let host = ctx.hostname();
    let internal = anchors
        .iter()
        .filter(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| href.starts_with('/') || (!host.is_empty() && href.contains(host)))
        })
        .count();
    let external = anchors.len() - internal;

    LINKS
        .result(true, 100, format!("Found {} total links", anchors.len()))
        .explain("Links define the structure of the site and how authority flows between pages.")
        .fix("Keep a healthy ratio of internal to external links.")
        .detail(format!("Internal: {}", internal))
        .detail(format!("External: {}", external))
}

pub fn check_http_status(ctx: &PageContext<'_>) -> CheckResult {
    let status = ctx.status;
    match status {
        200..=299 => HTTP_STATUS
            .result(true, 100, format!("Page answered with status {}", status))
            .explain("Search engines only index pages that answer with a success status.")
            .fix("No action needed."),
        300..=399 => HTTP_STATUS
            .result(false, 50, format!("Page answered with redirect status {}", status))
            .explain("The final response was a redirect, so crawlers must make an extra hop to reach the content.")
            .fix("Link directly to the final URL and keep redirect chains short.")
            .recommend("Avoid redirecting the audited URL."),
        _ => HTTP_STATUS
            .result(false, 0, format!("Page answered with error status {}", status))
            .explain("Pages answering with client or server errors are dropped from search results.")
            .fix("Make sure the URL serves the page with a 200 status.")
            .recommend("Fix the error status."),
    }
}
