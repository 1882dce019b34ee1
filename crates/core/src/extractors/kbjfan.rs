// ABOUTME: KBJFan extractor: dated post pages carrying a <video> tag and an info block.
// ABOUTME: The page is the only source, so every field is read from its markup.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::duration_parse::parse_duration_seconds;
use crate::error::ExtractError;
use crate::extractors::markup::{labeled_field, search, search_html};
use crate::extractors::meta::{extract_attr_first, og_thumbnail, read_meta};
use crate::extractors::page::Webpage;
use crate::extractors::stream::{resolve_formats, SourceKind, StreamProbe};
use crate::extractors::{strip_site_suffix, ExtractContext, SiteExtractor};
use crate::html_utils::{clean_html, decode_entities};
use crate::result::{Extracted, MediaRecord};
use crate::time_parse::parse_day;
use crate::url_utils::{absolutize, bare_host};

static DEFAULT_BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.kbjfan.com/").unwrap());

static POST_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/(?P<year>\d{4})/(?P<month>\d{2})/(?P<day>\d{2})/(?P<id>[^/]+)(?:/|$)").unwrap()
});

static VIDEO_TAG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<video[^>]+src=["']([^"']+)["']"#).unwrap());

static CDN_MP4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(https?://[^"']+videosnoerroranymore\.com/videos/[^"']+\.mp4)"#).unwrap()
});

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"<h1[^>]*>([^<]+)</h1>").unwrap());

static BJ_NAME: Lazy<Regex> = Lazy::new(|| labeled_field("BJ Name"));
static PLATFORM: Lazy<Regex> = Lazy::new(|| labeled_field("Platform"));
static VIDEO_DURATION: Lazy<Regex> = Lazy::new(|| labeled_field("Video Duration"));
static LIVE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Live Date:\s*</strong>\s*(?P<value>\d{4}-\d{2}-\d{2})").unwrap());

const TITLE_SUFFIX: &str = " - KBJFan";

fn probes() -> [StreamProbe; 2] {
    [
        StreamProbe::Markup {
            pattern: &VIDEO_TAG_SRC,
            kind: SourceKind::File,
        },
        StreamProbe::Markup {
            pattern: &CDN_MP4,
            kind: SourceKind::File,
        },
    ]
}

/// KBJFan video post.
#[derive(Debug, Clone)]
pub struct KbjFan {
    base: Url,
}

impl Default for KbjFan {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.clone(),
        }
    }
}

impl KbjFan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches posts on another origin instead of kbjfan.com.
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base = base;
        self
    }
}

impl SiteExtractor for KbjFan {
    fn name(&self) -> &'static str {
        "kbjfan"
    }

    fn domains(&self) -> Vec<String> {
        bare_host(&self.base).into_iter().collect()
    }

    fn suitable(&self, url: &Url) -> bool {
        let host = bare_host(url);
        host.is_some() && host == bare_host(&self.base) && POST_PATH.is_match(url.path())
    }

    fn extract(&self, ctx: &ExtractContext<'_>, url: &Url) -> Result<Extracted, ExtractError> {
        let id = POST_PATH
            .captures(url.path())
            .and_then(|caps| caps.name("id"))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                ExtractError::unsupported(
                    url.as_str(),
                    "Extract",
                    Some(anyhow::anyhow!("not a KBJFan post URL")),
                )
            })?;

        let page = Webpage::new(ctx.fetcher, url, &id);
        let html = page.html()?;
        let formats = resolve_formats(ctx, &probes(), &Value::Null, &page, &id, "mp4")?;
        let doc = page.loaded_document();

        let raw_title = doc
            .and_then(|d| read_meta(d, &["og:title", "twitter:title"]))
            .or_else(|| search_html(html, &HEADING))
            .unwrap_or_else(|| id.clone());
        let description = doc
            .and_then(|d| read_meta(d, &["og:description", "twitter:description", "description"]))
            .map(|d| clean_html(&d))
            .filter(|d| !d.is_empty());
        let thumbnail = doc
            .and_then(|d| {
                extract_attr_first(d, "video[poster]", "poster").or_else(|| og_thumbnail(d))
            })
            .map(|t| absolutize(&t, Some(url)));

        let mut record = MediaRecord {
            id: id.clone(),
            extractor: self.name().to_string(),
            webpage_url: url.to_string(),
            title: strip_site_suffix(&raw_title, TITLE_SUFFIX),
            formats,
            uploader: search(html, &BJ_NAME).map(|v| decode_entities(&v)),
            duration: search(html, &VIDEO_DURATION).and_then(|d| parse_duration_seconds(&d)),
            description,
            thumbnail,
            platform: search(html, &PLATFORM).map(|v| decode_entities(&v)),
            ..Default::default()
        };
        record.set_release(search(html, &LIVE_DATE).and_then(|d| parse_day(&d)));
        record
            .http_headers
            .insert("Referer".to_string(), url.to_string());

        info!(id = %record.id, "resolved KBJFan post");
        Ok(Extracted::Media(record))
    }
}
