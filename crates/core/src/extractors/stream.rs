// ABOUTME: Ordered stream-URL strategies: structured payload fields first, then markup scans.
// ABOUTME: The first probe yielding a well-formed URL of the expected shape wins.

//! Stream URL resolution.
//!
//! A site describes where its playable URL may live as a list of
//! [`StreamProbe`]s. [`resolve_stream`] evaluates them in order; markup probes
//! download the page lazily, so a payload hit never costs a page fetch.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::ExtractError;
use crate::extractors::markup::search;
use crate::extractors::page::Webpage;
use crate::extractors::ExtractContext;
use crate::html_utils::decode_entities;
use crate::result::Format;
use crate::url_utils::{absolutize, url_or_none};

/// Any quoted absolute URL ending in `.m3u8`, optionally followed by a query.
pub static QUOTED_M3U8_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["'](?P<value>https?://[^"']+\.m3u8(?:\?[^"']*)?)["']"#).unwrap()
});

/// What a discovered URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A playlist (HLS) that expands into variants.
    Manifest,
    /// A single media file.
    File,
}

impl SourceKind {
    fn accepts(self, url: &str) -> bool {
        match self {
            SourceKind::Manifest => url.contains(".m3u8"),
            SourceKind::File => true,
        }
    }
}

/// One strategy for locating the stream URL.
#[derive(Debug, Clone, Copy)]
pub enum StreamProbe {
    /// JSON pointers into the structured payload, tried in order.
    Payload {
        pointers: &'static [&'static str],
        kind: SourceKind,
    },
    /// A pattern scanned over the raw page markup.
    Markup {
        pattern: &'static Regex,
        kind: SourceKind,
    },
}

impl StreamProbe {
    fn kind(&self) -> SourceKind {
        match self {
            StreamProbe::Payload { kind, .. } | StreamProbe::Markup { kind, .. } => *kind,
        }
    }
}

/// The winning stream URL, already absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSource {
    pub url: String,
    pub kind: SourceKind,
    /// Position of the probe that produced it.
    pub probe: usize,
}

/// Evaluates `probes` in order against `payload` and the page.
///
/// Returns `Ok(None)` when every probe came up empty. A failed page download
/// is propagated.
pub fn resolve_stream(
    probes: &[StreamProbe],
    payload: &Value,
    page: &Webpage<'_>,
) -> Result<Option<StreamSource>, ExtractError> {
    for (idx, probe) in probes.iter().enumerate() {
        let kind = probe.kind();
        let found = match probe {
            StreamProbe::Payload { pointers, .. } => pointers.iter().find_map(|p| {
                payload
                    .pointer(p)
                    .and_then(Value::as_str)
                    .and_then(url_or_none)
                    .filter(|u| kind.accepts(u))
            }),
            StreamProbe::Markup { pattern, .. } => {
                let html = page.html()?;
                search(html, pattern)
                    .map(|raw| decode_entities(&raw))
                    .filter(|u| kind.accepts(u))
            }
        };

        let Some(raw) = found else {
            continue;
        };

        let url = absolutize(&raw, Some(page.url()));
        if url_or_none(&url).is_none() {
            debug!(probe = idx, %raw, "discarding malformed stream URL");
            continue;
        }

        debug!(probe = idx, ?kind, %url, "stream URL resolved");
        return Ok(Some(StreamSource {
            url,
            kind,
            probe: idx,
        }));
    }
    Ok(None)
}

/// Turns a stream source into formats, expanding manifests through the
/// context's resolver.
pub fn build_formats(
    ctx: &ExtractContext<'_>,
    source: &StreamSource,
    id: &str,
    ext: &str,
) -> Result<Vec<Format>, ExtractError> {
    let formats = match source.kind {
        SourceKind::Manifest => ctx.manifests.expand(&source.url, id, ext)?,
        SourceKind::File => vec![Format::direct(source.url.clone(), ext)],
    };
    if formats.is_empty() {
        return Err(ExtractError::no_formats(id));
    }
    Ok(formats)
}

/// Runs the whole chain: probes, then format construction.
///
/// Fails with an expected resolution error when no probe finds anything.
pub fn resolve_formats(
    ctx: &ExtractContext<'_>,
    probes: &[StreamProbe],
    payload: &Value,
    page: &Webpage<'_>,
    id: &str,
    ext: &str,
) -> Result<Vec<Format>, ExtractError> {
    match resolve_stream(probes, payload, page)? {
        Some(source) => build_formats(ctx, &source, id, ext),
        None => Err(ExtractError::no_formats(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::testing::StaticFetcher;
    use crate::manifest::DeferredHls;
    use crate::result::Protocol;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use url::Url;

    static MP4_SRC: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"src=["'](?P<value>[^"']+\.mp4)["']"#).unwrap());

    fn probes() -> [StreamProbe; 3] {
        [
            StreamProbe::Payload {
                pointers: &["/hlsUrl", "/url"],
                kind: SourceKind::Manifest,
            },
            StreamProbe::Markup {
                pattern: &QUOTED_M3U8_URL,
                kind: SourceKind::Manifest,
            },
            StreamProbe::Markup {
                pattern: &MP4_SRC,
                kind: SourceKind::File,
            },
        ]
    }

    fn page_url() -> Url {
        Url::parse("https://example.com/video/abc").unwrap()
    }

    #[test]
    fn payload_manifest_wins_without_fetching_page() {
        let fetcher = StaticFetcher::default();
        let url = page_url();
        let page = Webpage::new(&fetcher, &url, "abc");
        let payload = json!({"hlsUrl": "https://cdn.example.com/abc/master.m3u8"});

        let source = resolve_stream(&probes(), &payload, &page).unwrap().unwrap();
        assert_eq!(source.probe, 0);
        assert_eq!(source.kind, SourceKind::Manifest);
        assert!(!page.is_loaded());
        assert_eq!(fetcher.text_calls(), 0);
    }

    #[test]
    fn non_manifest_payload_falls_through_to_markup() {
        let fetcher = StaticFetcher::default().with_text(
            "https://example.com/video/abc",
            r#"<script>var src = "https://cdn.example.com/abc.m3u8?token=1&amp;x=2";</script>"#,
        );
        let url = page_url();
        let page = Webpage::new(&fetcher, &url, "abc");
        let payload = json!({"hlsUrl": "https://cdn.example.com/abc.mp4"});

        let source = resolve_stream(&probes(), &payload, &page).unwrap().unwrap();
        assert_eq!(source.probe, 1);
        assert_eq!(source.url, "https://cdn.example.com/abc.m3u8?token=1&x=2");
        assert_eq!(fetcher.text_calls(), 1);
    }

    #[test]
    fn media_src_is_made_absolute() {
        let fetcher = StaticFetcher::default().with_text(
            "https://example.com/video/abc",
            r#"<video><source src="//cdn.example.com/v.mp4"></video>"#,
        );
        let url = page_url();
        let page = Webpage::new(&fetcher, &url, "abc");

        let source = resolve_stream(&probes(), &Value::Null, &page).unwrap().unwrap();
        assert_eq!(source.probe, 2);
        assert_eq!(source.kind, SourceKind::File);
        assert_eq!(source.url, "https://cdn.example.com/v.mp4");
    }

    #[test]
    fn page_is_fetched_once_across_markup_probes() {
        let fetcher = StaticFetcher::default().with_text("https://example.com/video/abc", "<p>nothing</p>");
        let url = page_url();
        let page = Webpage::new(&fetcher, &url, "abc");

        assert_eq!(resolve_stream(&probes(), &Value::Null, &page).unwrap(), None);
        assert_eq!(fetcher.text_calls(), 1);
    }

    #[test]
    fn page_fetch_failure_propagates() {
        let fetcher = StaticFetcher::default();
        let url = page_url();
        let page = Webpage::new(&fetcher, &url, "abc");

        let err = resolve_stream(&probes(), &Value::Null, &page).unwrap_err();
        assert!(err.is_fetch());
    }

    #[test]
    fn resolve_formats_reports_no_formats_as_expected() {
        let fetcher = StaticFetcher::default().with_text("https://example.com/video/abc", "<p></p>");
        let url = page_url();
        let page = Webpage::new(&fetcher, &url, "abc");
        let ctx = ExtractContext {
            fetcher: &fetcher,
            manifests: &DeferredHls,
        };

        let err = resolve_formats(&ctx, &probes(), &Value::Null, &page, "abc", "mp4").unwrap_err();
        assert!(err.is_expected());
        assert_eq!(err.target, "abc");
    }

    #[test]
    fn resolve_formats_expands_manifest() {
        let fetcher = StaticFetcher::default();
        let url = page_url();
        let page = Webpage::new(&fetcher, &url, "abc");
        let ctx = ExtractContext {
            fetcher: &fetcher,
            manifests: &DeferredHls,
        };
        let payload = json!({"url": "https://cdn.example.com/abc.m3u8"});

        let formats = resolve_formats(&ctx, &probes(), &payload, &page, "abc", "mp4").unwrap();
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].protocol, Protocol::M3u8Native);
    }
}
