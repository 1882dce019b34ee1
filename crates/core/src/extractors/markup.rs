// ABOUTME: Regex scanning of raw page markup for values that are not exposed through the DOM.
// ABOUTME: Patterns capture their value in a group named `value` or, failing that, group 1.

use regex::Regex;

use crate::html_utils::clean_html;

/// Returns the first non-empty capture of `pattern` in `text`, trimmed.
pub fn search(text: &str, pattern: &Regex) -> Option<String> {
    pattern.captures_iter(text).find_map(|caps| {
        caps.name("value")
            .or_else(|| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

/// Like [`search`], with the captured markup converted to plain text.
pub fn search_html(text: &str, pattern: &Regex) -> Option<String> {
    search(text, pattern)
        .map(|raw| clean_html(&raw))
        .filter(|v| !v.is_empty())
}

/// Builds the pattern for a `<strong>Label:</strong> value` info row.
pub fn labeled_field(label: &str) -> Regex {
    Regex::new(&format!(
        r"{}:\s*</strong>\s*(?P<value>[^<\n]+)",
        regex::escape(label)
    ))
    .unwrap()
}
