// ABOUTME: URL helpers shared by extractors: validation, scheme completion, and slugs.
// ABOUTME: Slugs are cosmetic path fragments; the item id is what identifies a video.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

/// Returns the trimmed value if it is an absolute http(s) URL or a
/// protocol-relative `//host/path` reference.
pub fn url_or_none(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(rest) = value.strip_prefix("//") {
        return (!rest.is_empty() && !rest.starts_with('/')).then(|| value.to_string());
    }
    let parsed = Url::parse(value).ok()?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Some(value.to_string()),
        _ => None,
    }
}

/// Makes `href` absolute relative to the page it was found on.
///
/// `//host/path` inherits the page scheme, falling back to https when the
/// page is unknown or not served over HTTP. Relative paths are joined to the
/// page URL; if that is impossible the input is returned unchanged.
pub fn absolutize(href: &str, page: Option<&Url>) -> String {
    let href = href.trim();
    if href.starts_with("//") {
        let scheme = page
            .map(Url::scheme)
            .filter(|s| *s == "http" || *s == "https")
            .unwrap_or("https");
        return format!("{}:{}", scheme, href);
    }
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    page.and_then(|base| base.join(href).ok())
        .map(String::from)
        .unwrap_or_else(|| href.to_string())
}

/// Builds a URL-safe slug from a title: spaces become hyphens and anything
/// outside `[A-Za-z0-9_-]` is dropped. Empty results fall back to "video".
pub fn slugify(title: &str) -> String {
    let hyphenated = title.trim().replace(' ', "-");
    let slug = NON_SLUG_CHARS.replace_all(&hyphenated, "");
    if slug.is_empty() {
        "video".to_string()
    } else {
        slug.into_owned()
    }
}

/// Returns the lowercase host of a URL without a leading `www.`.
pub fn bare_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}
