// ABOUTME: HTML cleanup helpers for free-text metadata such as descriptions.
// ABOUTME: Strips tags, decodes entities, and collapses whitespace.

use once_cell::sync::Lazy;
use regex::Regex;

static BREAK_TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</p>\s*<p[^>]*>").unwrap());
static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").unwrap());

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&lsquo;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&ldquo;", "\u{201C}"),
    ("&rdquo;", "\u{201D}"),
    ("&hellip;", "\u{2026}"),
    ("&copy;", "\u{00A9}"),
    ("&reg;", "\u{00AE}"),
    ("&trade;", "\u{2122}"),
    // Must stay last so "&amp;lt;" decodes to "&lt;" and not "<".
    ("&amp;", "&"),
];

/// Removes angle-bracketed markup, keeping the text between tags.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decodes named and numeric HTML entities.
pub fn decode_entities(s: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(s, |caps: &regex::Captures<'_>| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    let mut result = numeric.into_owned();
    for (entity, replacement) in NAMED_ENTITIES {
        if result.contains(entity) {
            result = result.replace(entity, replacement);
        }
    }
    result
}

/// Turns an HTML fragment into plain text.
///
/// Line breaks (`<br>`, paragraph boundaries) survive as `\n`; every other run
/// of whitespace collapses to a single space.
pub fn clean_html(s: &str) -> String {
    let with_breaks = BREAK_TAGS.replace_all(s, "\n");
    let text = decode_entities(&strip_tags(&with_breaks));
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strip_tags_keeps_text() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn decode_named_and_numeric() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&#39;quoted&#x27;"), "'quoted'");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn decode_leaves_invalid_numeric_alone() {
        assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
    }

    #[test]
    fn clean_html_strips_and_collapses() {
        let html = "  <p>Line   one</p><p>Line &amp; two</p>\n\n ";
        assert_eq!(clean_html(html), "Line one\nLine & two");
    }

    #[test]
    fn clean_html_br_becomes_newline() {
        assert_eq!(clean_html("a<br/>b<BR>c"), "a\nb\nc");
    }

    #[test]
    fn clean_html_plain_text_untouched() {
        assert_eq!(clean_html("just text"), "just text");
    }
}
