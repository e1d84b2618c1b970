// src/document.rs
//
// Thin query layer over `scraper::Html`. Parsing never fails: html5ever
// recovers from any input, so a malformed page simply yields fewer elements.
// Selector strings that fail to parse are logged and match nothing.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Elements matching a CSS selector, in document order.
    pub fn select<'a>(&'a self, css: &str) -> Vec<ElementRef<'a>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(e) => {
                warn!("Invalid CSS selector '{}': {:?}", css, e);
                Vec::new()
            }
        }
    }

    pub fn elements<'a>(&'a self, tag: &str) -> Vec<ElementRef<'a>> {
        self.select(tag)
    }

    /// Elements of `tag` whose `attr` satisfies `pred`. Elements lacking the
    /// attribute are skipped.
    pub fn find_by_attr<'a, P>(&'a self, tag: &str, attr: &str, pred: P) -> Vec<ElementRef<'a>>
    where
        P: Fn(&str) -> bool,
    {
        self.elements(tag)
            .into_iter()
            .filter(|el| el.value().attr(attr).is_some_and(|v| pred(v)))
            .collect()
    }

    /// Elements of `tag` whose `attr` equals `value`, ignoring ASCII case.
    pub fn find_by_attr_eq<'a>(&'a self, tag: &str, attr: &str, value: &str) -> Vec<ElementRef<'a>> {
        self.find_by_attr(tag, attr, |v| v.trim().eq_ignore_ascii_case(value))
    }

    pub fn count(&self, css: &str) -> usize {
        self.select(css).len()
    }

    pub fn exists(&self, css: &str) -> bool {
        self.count(css) > 0
    }

    /// Concatenated, trimmed text of the first match.
    pub fn first_text(&self, css: &str) -> Option<String> {
        self.select(css)
            .into_iter()
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }

    pub fn first_attr(&self, css: &str, attr: &str) -> Option<String> {
        self.select(css)
            .into_iter()
            .find_map(|el| el.value().attr(attr).map(str::to_string))
    }

    /// Every value of `attr` over the matches of `css`.
    pub fn attr_values(&self, css: &str, attr: &str) -> Vec<String> {
        self.select(css)
            .into_iter()
            .filter_map(|el| el.value().attr(attr).map(str::to_string))
            .collect()
    }

    /// `content` of the first `<meta name=...>` with that name (case-insensitive).
    pub fn meta_name(&self, name: &str) -> Option<String> {
        self.meta_content("name", name)
    }

    /// `content` of the first `<meta property=...>` with that property.
    pub fn meta_property(&self, property: &str) -> Option<String> {
        self.meta_content("property", property)
    }

    fn meta_content(&self, attr: &str, value: &str) -> Option<String> {
        self.find_by_attr_eq("meta", attr, value)
            .into_iter()
            .find_map(|el| el.value().attr("content").map(|c| c.trim().to_string()))
    }

    /// Attribute of the root `<html>` element.
    pub fn root_attr(&self, attr: &str) -> Option<String> {
        self.html
            .root_element()
            .value()
            .attr(attr)
            .map(str::to_string)
    }
}
