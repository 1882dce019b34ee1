// ABOUTME: PMVHaven extractors: single videos via the watch-page API with page fallbacks,
// ABOUTME: and profile listings via the paged profileInput API.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ExtractError;
use crate::extractors::meta::{first_text, og_description, og_thumbnail, read_meta};
use crate::extractors::page::Webpage;
use crate::extractors::payload::{first_str, first_str_list, first_value};
use crate::extractors::stream::{resolve_formats, SourceKind, StreamProbe, QUOTED_M3U8_URL};
use crate::extractors::{ExtractContext, SiteExtractor};
use crate::html_utils::clean_html;
use crate::resource::JsonRequest;
use crate::result::{CollectionRef, Extracted, MediaRecord, Playlist};
use crate::time_parse::parse_iso8601;
use crate::url_utils::{bare_host, slugify};

static DEFAULT_BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://pmvhaven.com/").unwrap());

static VIDEO_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/video/(?:[\w-]+_)?(?P<id>[a-f0-9]{24})").unwrap());

static PROFILE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/profile/(?P<id>[A-Za-z0-9_-]+)").unwrap());

static MP4_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src=["'](?P<value>[^"']+\.mp4)["']"#).unwrap());

const VIDEO_OBJECT: &[&str] = &["/data/video", "/video"];
const PAGE_ITEM_LISTS: &[&str] = &["videos", "processingVideos", "data"];

fn video_probes() -> [StreamProbe; 4] {
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
        StreamProbe::Payload {
            pointers: &["/url"],
            kind: SourceKind::File,
        },
    ]
}

/// Extracts the 24-hex video id from a PMVHaven video path.
pub fn video_id_from_path(path: &str) -> Option<String> {
    VIDEO_PATH
        .captures(path)
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str().to_string())
}

fn endpoint(base: &Url, path: &str) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), path)
}

fn serves(base: &Url, url: &Url) -> bool {
    let host = bare_host(url);
    host.is_some() && host == bare_host(base)
}

/// Single PMVHaven video.
#[derive(Debug, Clone)]
pub struct PmvHaven {
    base: Url,
}

impl Default for PmvHaven {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.clone(),
        }
    }
}

impl PmvHaven {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points API requests and host matching at another origin.
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base = base;
        self
    }

    fn watch_page(&self, ctx: &ExtractContext<'_>, id: &str) -> Value {
        let api_url = endpoint(&self.base, &format!("api/videos/{}/watch-page", id));
        match ctx.fetcher.fetch_json(&api_url, id, &JsonRequest::default()) {
            Ok(data) => first_value(&data, VIDEO_OBJECT)
                .cloned()
                .unwrap_or(Value::Null),
            Err(e) => {
                warn!(id, error = %e, "watch-page API unavailable, falling back to page");
                Value::Null
            }
        }
    }
}

impl SiteExtractor for PmvHaven {
    fn name(&self) -> &'static str {
        "pmvhaven"
    }

    fn domains(&self) -> Vec<String> {
        bare_host(&self.base).into_iter().collect()
    }

    fn suitable(&self, url: &Url) -> bool {
        serves(&self.base, url) && VIDEO_PATH.is_match(url.path())
    }

    fn extract(&self, ctx: &ExtractContext<'_>, url: &Url) -> Result<Extracted, ExtractError> {
        let id = video_id_from_path(url.path()).ok_or_else(|| {
            ExtractError::unsupported(
                url.as_str(),
                "Extract",
                Some(anyhow::anyhow!("not a PMVHaven video URL")),
            )
        })?;

        let video = self.watch_page(ctx, &id);
        let page = Webpage::new(ctx.fetcher, url, &id);
        let formats = resolve_formats(ctx, &video_probes(), &video, &page, &id, "mp4")?;

        let doc = page.loaded_document();
        let title = first_str(&video, &["/title"])
            .or_else(|| doc.and_then(|d| read_meta(d, &["og:title", "twitter:title"])))
            .or_else(|| doc.and_then(|d| first_text(d, "h1")))
            .unwrap_or_else(|| id.clone());
        let description = first_str(&video, &["/description"])
            .or_else(|| doc.and_then(og_description))
            .map(|d| clean_html(&d))
            .filter(|d| !d.is_empty());
        let thumbnail = first_str(&video, &["/thumbnailUrl"]).or_else(|| doc.and_then(og_thumbnail));

        let mut record = MediaRecord {
            id: id.clone(),
            extractor: self.name().to_string(),
            webpage_url: url.to_string(),
            title,
            formats,
            uploader: first_str(&video, &["/creator/0", "/creator", "/uploader"]),
            description,
            thumbnail,
            tags: first_str_list(&video, &["/tags"]),
            age_limit: Some(18),
            ..Default::default()
        };
        record.set_release(first_str(&video, &["/uploadDate"]).and_then(|s| parse_iso8601(&s)));

        info!(id = %record.id, formats = record.formats.len(), "resolved PMVHaven video");
        Ok(Extracted::Media(record))
    }
}

/// All videos of a PMVHaven profile, as unresolved references.
#[derive(Debug, Clone)]
pub struct PmvHavenProfile {
    base: Url,
}

impl Default for PmvHavenProfile {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.clone(),
        }
    }
}

impl PmvHavenProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points API requests, host matching and entry URLs at another origin.
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base = base;
        self
    }

    fn fetch_page(
        &self,
        ctx: &ExtractContext<'_>,
        profile: &str,
        index: u32,
    ) -> Result<Value, ExtractError> {
        let mode = if index == 1 {
            "getProfileVideos"
        } else {
            "GetMoreProfileVideos"
        };
        let body = json!({"mode": mode, "user": profile, "index": index});
        let req = JsonRequest::post(body.to_string())
            .header("Content-Type", "text/plain;charset=UTF-8");
        debug!(profile, page = index, mode, "requesting profile page");
        ctx.fetcher
            .fetch_json(&endpoint(&self.base, "api/v2/profileInput"), profile, &req)
    }

    /// Appends the page's usable items to `entries` and returns how many
    /// references were added.
    fn collect_page(&self, page: &Value, profile: &str, entries: &mut Vec<CollectionRef>) -> usize {
        let before = entries.len();
        let items = PAGE_ITEM_LISTS
            .iter()
            .filter_map(|key| page.get(*key).and_then(Value::as_array))
            .flatten();
        entries.extend(items.filter_map(|item| self.entry(item, profile)));
        entries.len() - before
    }

    fn entry(&self, item: &Value, profile: &str) -> Option<CollectionRef> {
        let Some(id) = first_str(item, &["/_id"]) else {
            debug!(profile, "skipping profile item without _id");
            return None;
        };
        let title = first_str(item, &["/title"]);
        let slug = slugify(title.as_deref().unwrap_or("video"));
        let url = endpoint(&self.base, &format!("video/{}_{}", slug, id));

        let resolvable = Url::parse(&url)
            .ok()
            .and_then(|u| video_id_from_path(u.path()))
            .is_some_and(|found| found == id);
        if !resolvable {
            debug!(profile, %id, "skipping profile item with unrecognised id");
            return None;
        }

        Some(CollectionRef {
            id,
            title,
            url,
            uploader: Some(profile.to_string()),
        })
    }

    /// Pages through the profile until the reported total is collected.
    pub fn list(&self, ctx: &ExtractContext<'_>, profile: &str) -> Result<Playlist, ExtractError> {
        let first = self.fetch_page(ctx, profile, 1).map_err(|e| {
            ExtractError::resolution(profile, "ListCollection", Some(anyhow::Error::new(e)))
        })?;
        let total = total_count(&first);

        let mut entries = Vec::new();
        let mut added = self.collect_page(&first, profile, &mut entries);
        let mut index = 1;

        while entries.len() < total && added > 0 {
            index += 1;
            let page = match self.fetch_page(ctx, profile, index) {
                Ok(page) => page,
                Err(e) => {
                    warn!(profile, page = index, error = %e, "profile page failed, stopping");
                    break;
                }
            };
            added = self.collect_page(&page, profile, &mut entries);
            if added == 0 {
                debug!(profile, page = index, "no usable items on profile page, stopping");
            }
        }

        info!(profile, total, collected = entries.len(), "listed PMVHaven profile");
        Ok(Playlist {
            id: profile.to_string(),
            title: Some(format!("{}'s Profile", profile)),
            extractor: self.name().to_string(),
            entries,
        })
    }
}

fn total_count(page: &Value) -> usize {
    let count = match page.get("count") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    count.unwrap_or(0) as usize
}

impl SiteExtractor for PmvHavenProfile {
    fn name(&self) -> &'static str {
        "pmvhaven:profile"
    }

    fn domains(&self) -> Vec<String> {
        bare_host(&self.base).into_iter().collect()
    }

    fn suitable(&self, url: &Url) -> bool {
        serves(&self.base, url) && PROFILE_PATH.is_match(url.path())
    }

    fn extract(&self, ctx: &ExtractContext<'_>, url: &Url) -> Result<Extracted, ExtractError> {
        let profile = PROFILE_PATH
            .captures(url.path())
            .and_then(|caps| caps.name("id"))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                ExtractError::unsupported(
                    url.as_str(),
                    "Extract",
                    Some(anyhow::anyhow!("not a PMVHaven profile URL")),
                )
            })?;
        self.list(ctx, &profile).map(Extracted::Playlist)
    }
}
