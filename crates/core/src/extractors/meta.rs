// ABOUTME: Document meta reader: <meta> tag lookup in priority order plus social-card shortcuts.
// ABOUTME: Keys match either the property= or the name= attribute, first non-empty content wins.

//! Meta tag helpers.
//!
//! Key behaviors:
//! - Keys are tried in order; first non-empty `content` wins.
//! - Each key matches `property=` before `name=` (`og:*` uses property,
//!   `twitter:*` and `description` usually use name).
//! - Values are trimmed; empty values count as missing.

use scraper::{Html, Selector};

/// Extracts the `content` attribute from the first matching meta tag.
pub fn extract_meta_content(doc: &Html, selector: &str) -> Option<String> {
    extract_attr_first(doc, selector, "content")
}

/// Extracts an attribute value from the first matching element.
pub fn extract_attr_first(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel).find_map(|el| {
        el.value()
            .attr(attr)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

/// Reads the first meta value among `keys`, in priority order.
pub fn read_meta(doc: &Html, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        ["property", "name", "itemprop"].iter().find_map(|attr| {
            let selector = format!("meta[{}=\"{}\"]", attr, key);
            extract_meta_content(doc, &selector)
        })
    })
}

/// Social-card title.
pub fn og_title(doc: &Html) -> Option<String> {
    read_meta(doc, &["og:title"])
}

/// Social-card description.
pub fn og_description(doc: &Html) -> Option<String> {
    read_meta(doc, &["og:description"])
}

/// Social-card image.
pub fn og_thumbnail(doc: &Html) -> Option<String> {
    read_meta(doc, &["og:image", "og:image:url", "og:image:secure_url"])
}

/// Text of the first element matching `selector`, whitespace-collapsed.
pub fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel).find_map(|el| {
        let text = el.text().collect::<Vec<_>>().join(" ");
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        (!normalized.is_empty()).then_some(normalized)
    })
}
