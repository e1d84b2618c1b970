use regex::Regex;
use std::sync::LazyLock;

use super::PageContext;
use crate::types::*;

pub const FAVICON: CheckMeta = CheckMeta::new("Favicon", Impact::Low, Difficulty::Easy);
pub const LANGUAGE: CheckMeta = CheckMeta::new("Language", Impact::Medium, Difficulty::Easy)
    .learn_more("https://developer.mozilla.org/en-US/docs/Web/HTML/Global_attributes/lang");
pub const PRINT_FRIENDLY: CheckMeta = CheckMeta::new("Print Friendly", Impact::Low, Difficulty::Medium);
pub const CONTACT_INFO: CheckMeta = CheckMeta::new("Contact Info", Impact::Medium, Difficulty::Easy);

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+\d{1,2}\s?)?1?-?\.?\s?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}")
        .unwrap_or_else(|e| panic!("PHONE_RE failed to compile: {}", e))
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}")
        .unwrap_or_else(|e| panic!("EMAIL_RE failed to compile: {}", e))
});

pub fn run(ctx: &PageContext<'_>) -> Vec<CheckResult> {
    vec![
        check_favicon(ctx),
        check_language(ctx),
        check_print_friendly(ctx),
        check_contact_info(ctx),
    ]
}

pub fn check_favicon(ctx: &PageContext<'_>) -> CheckResult {
    let icon = ctx
        .document
        .find_by_attr("link", "rel", |rel| rel.to_ascii_lowercase().contains("icon"))
        .into_iter()
        .next();

    match icon {
        Some(link) => FAVICON
            .result(true, 100, "Favicon found.")
            .explain("Favicons help users pick out your tab in their browser.")
            .fix("Favicon is present.")
            .with_details(link.value().attr("href")),
        None => FAVICON
            .result(false, 0, "Favicon missing")
            .explain("A missing favicon looks unprofessional and makes tabs hard to find.")
            .fix("Link your icon in `<head>`:\n```html\n<link rel=\"icon\" type=\"image/x-icon\" href=\"/favicon.ico\">\n```")
            .recommend("Add a favicon."),
    }
}

pub fn check_language(ctx: &PageContext<'_>) -> CheckResult {
    match ctx.document.root_attr("lang").filter(|l| !l.trim().is_empty()) {
        Some(lang) => LANGUAGE
            .result(true, 100, format!("Language specified: {}", lang))
            .explain("Declaring a language helps screen readers and translation tools.")
            .fix("Language is correctly set."),
        None => LANGUAGE
            .result(false, 0, "Language attribute missing")
            .explain("Without a language attribute, browsers and assistive tools guess, often wrongly.")
            .fix("Update your opening HTML tag:\n```html\n<html lang=\"en\">\n```")
            .recommend("Specify language in html tag."),
    }
}

/// Informational: a missing print stylesheet is not penalized.
pub fn check_print_friendly(ctx: &PageContext<'_>) -> CheckResult {
    let print_link = !ctx
        .document
        .find_by_attr("link", "media", |media| media.to_ascii_lowercase().contains("print"))
        .is_empty();
    let print_block = ctx.html.to_ascii_lowercase().contains("@media print");

    if print_link || print_block {
        PRINT_FRIENDLY
            .result(true, 100, "Print stylesheet detected.")
            .explain("Print styles make the page look right on paper by hiding navigation and adjusting colors.")
            .fix("Print optimization is active.")
    } else {
        PRINT_FRIENDLY
            .result(true, 100, "No print stylesheet found (optional)")
            .explain("Not strictly required, but useful for articles and recipes.")
            .fix("Add a print block to your CSS:\n```css\n@media print {\n  nav, footer, .ad { display: none; }\n  body { color: black; background: white; }\n}\n```")
    }
}

/// Informational: pages may rely on a contact form instead.
pub fn check_contact_info(ctx: &PageContext<'_>) -> CheckResult {
    let email = EMAIL_RE.find(ctx.html).map(|m| m.as_str().to_string());
    let phone = PHONE_RE.find(ctx.html).map(|m| m.as_str().trim().to_string());

    if email.is_some() || phone.is_some() {
        CONTACT_INFO
            .result(true, 100, "Contact information found.")
            .explain("Visible contact details build trust and help local SEO.")
            .fix("Contact info is visible.")
            .with_details(email.into_iter().chain(phone))
    } else {
        CONTACT_INFO
            .result(true, 100, "No phone or email detected directly.")
            .explain("Clear contact details improve trust.")
            .fix("Make a phone number or email address visible if applicable.")
    }
}
