use url::Url;

use super::PageContext;
use crate::types::*;

pub const SOCIAL_ACCOUNTS: CheckMeta = CheckMeta::new("Social Accounts", Impact::Medium, Difficulty::Easy);
pub const OPEN_GRAPH: CheckMeta = CheckMeta::new("Open Graph", Impact::Medium, Difficulty::Easy)
    .learn_more("https://ogp.me/");
pub const TWITTER_CARD: CheckMeta = CheckMeta::new("Twitter Card", Impact::Low, Difficulty::Easy)
    .learn_more("https://developer.x.com/en/docs/x-for-websites/cards/overview/markup");

pub const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "instagram.com",
    "youtube.com",
    "tiktok.com",
    "github.com",
    "threads.net",
    "discord.com",
];

pub fn run(ctx: &PageContext<'_>) -> Vec<CheckResult> {
    vec![
        check_social_accounts(ctx),
        check_open_graph(ctx),
        check_twitter_card(ctx),
    ]
}

/// Platform domain a link points at, matching the host exactly or as a
/// subdomain so that `dropbox.com` is not taken for `x.com`. Scheme-less
/// hrefs like `www.facebook.com/acme` are also read as a bare host.
pub fn social_domain(base: &Url, href: &str) -> Option<&'static str> {
    let href = href.trim();
    let resolved = base.join(href).ok().and_then(|url| platform_of(&url));
    resolved.or_else(|| {
        let bare = Url::parse(href).is_err() && !href.starts_with(['/', '#', '?']);
        if bare {
            Url::parse(&format!("https://{}", href)).ok().and_then(|url| platform_of(&url))
        } else {
            None
        }
    })
}

fn platform_of(url: &Url) -> Option<&'static str> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();
    SOCIAL_DOMAINS
        .iter()
        .copied()
        .find(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

pub fn check_social_accounts(ctx: &PageContext<'_>) -> CheckResult {
    let mut found: Vec<&'static str> = Vec::new();
    for href in ctx.document.attr_values("a[href]", "href") {
        if let Some(domain) = social_domain(ctx.url, &href) {
            if !found.contains(&domain) {
                found.push(domain);
            }
        }
    }

    if found.is_empty() {
        SOCIAL_ACCOUNTS
            .result(false, 0, "No social media links found")
            .explain("Social signals are indirect ranking factors.")
            .fix("Add links to your active social media profiles in the header or footer.")
            .recommend("Link your social media profiles.")
    } else {
        SOCIAL_ACCOUNTS
            .result(true, 100, format!("Found links to: {}", found.join(", ")))
            .explain("Social media drives traffic and builds brand authority.")
            .fix("Great, you are linking to social profiles.")
            .with_details(found)
    }
}

pub fn check_open_graph(ctx: &PageContext<'_>) -> CheckResult {
    match ctx.document.meta_property("og:title").filter(|t| !t.is_empty()) {
        Some(title) => OPEN_GRAPH
            .result(true, 100, "Open Graph tags present.")
            .explain("Open Graph controls how your content is displayed when shared on social media.")
            .fix("Implementation is correct.")
            .detail(title),
        None => OPEN_GRAPH
            .result(false, 0, "Open Graph tags missing")
            .explain("Without OG tags, social networks guess which image and title to use.")
            .fix("Add these tags to `<head>`:\n```html\n<meta property=\"og:title\" content=\"Your Title\">\n<meta property=\"og:description\" content=\"Description\">\n<meta property=\"og:image\" content=\"https://example.com/thumb.jpg\">\n```")
            .recommend("Add OG tags for better sharing."),
    }
}

pub fn check_twitter_card(ctx: &PageContext<'_>) -> CheckResult {
    match ctx.document.meta_name("twitter:card").filter(|c| !c.is_empty()) {
        Some(card) => TWITTER_CARD
            .result(true, 100, "Twitter Card meta tag is present.")
            .explain("Twitter Card tags control the preview shown when the page is shared on X/Twitter.")
            .fix("Implementation is correct.")
            .detail(card),
        None => TWITTER_CARD
            .result(false, 0, "Missing Twitter Card tags.")
            .explain("Without card tags, shared links show a bare URL instead of a rich preview.")
            .fix("Add this to `<head>`:\n```html\n<meta name=\"twitter:card\" content=\"summary_large_image\">\n```")
            .recommend("Add Twitter Card tags for Twitter optimization."),
    }
}
