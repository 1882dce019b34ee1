// ABOUTME: Output records produced by extractors: MediaRecord, Format, CollectionRef, and Playlist.
// ABOUTME: These shapes are the whole contract consumed by a downstream downloader.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time_parse::upload_date_digits;

/// Transfer protocol a downloader needs for a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Https,
    Http,
    M3u8Native,
}

impl Protocol {
    /// Picks Http or Https from the scheme of a direct file URL.
    pub fn for_direct_url(url: &str) -> Self {
        if url.starts_with("http://") {
            Protocol::Http
        } else {
            Protocol::Https
        }
    }
}

/// One playable variant of a media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_id: Option<String>,
    pub url: String,
    /// Container extension, e.g. "mp4".
    pub ext: String,
    pub protocol: Protocol,
}

impl Format {
    /// A single-file format for a direct media URL.
    pub fn direct(url: impl Into<String>, ext: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            format_id: None,
            protocol: Protocol::for_direct_url(&url),
            url,
            ext: ext.into(),
        }
    }
}

/// Normalized metadata for a single media item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: String,
    pub extractor: String,
    pub webpage_url: String,
    pub title: String,
    pub formats: Vec<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_limit: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub http_headers: BTreeMap<String, String>,
}

impl MediaRecord {
    /// Sets `upload_date` and `timestamp` together from one instant, so both
    /// always name the same UTC calendar day. `None` clears both.
    pub fn set_release(&mut self, released: Option<DateTime<Utc>>) {
        self.upload_date = released.as_ref().map(upload_date_digits);
        self.timestamp = released.map(|dt| dt.timestamp());
    }

    /// URL of the first (preferred) format.
    pub fn primary_url(&self) -> Option<&str> {
        self.formats.first().map(|f| f.url.as_str())
    }

    /// Returns true if the record carries at least one playable format.
    pub fn is_playable(&self) -> bool {
        !self.formats.is_empty()
    }
}

/// A lazily-resolvable pointer to one item of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// URL accepted by the single-item extractor for this site.
    pub url: String,
    /// Collection owner, provisional until the item itself is resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
}

/// An ordered list of references produced by a collection extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub extractor: String,
    pub entries: Vec<CollectionRef>,
}

/// What an extractor produced for a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "snake_case")]
pub enum Extracted {
    #[serde(rename = "video")]
    Media(MediaRecord),
    Playlist(Playlist),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_release_keeps_date_and_timestamp_in_step() {
        let mut record = MediaRecord::default();
        let dt = Utc.with_ymd_and_hms(2024, 6, 24, 23, 59, 59).unwrap();
        record.set_release(Some(dt));

        assert_eq!(record.upload_date.as_deref(), Some("20240624"));
        let ts = record.timestamp.unwrap();
        let day = Utc.timestamp_opt(ts, 0).unwrap().format("%Y%m%d").to_string();
        assert_eq!(record.upload_date.as_deref(), Some(day.as_str()));

        record.set_release(None);
        assert!(record.upload_date.is_none());
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn direct_format_protocol_from_scheme() {
        assert_eq!(Format::direct("https://a/b.mp4", "mp4").protocol, Protocol::Https);
        assert_eq!(Format::direct("http://a/b.mp4", "mp4").protocol, Protocol::Http);
    }

    #[test]
    fn media_serializes_with_type_tag_and_skips_absent_fields() {
        let record = MediaRecord {
            id: "abc".to_string(),
            extractor: "kbjfan".to_string(),
            webpage_url: "https://www.kbjfan.com/2026/01/20/abc/".to_string(),
            title: "abc".to_string(),
            formats: vec![Format::direct("https://cdn/v.mp4", "mp4")],
            ..Default::default()
        };
        let value = serde_json::to_value(Extracted::Media(record)).unwrap();

        assert_eq!(value["_type"], "video");
        assert_eq!(value["formats"][0]["protocol"], "https");
        assert!(value.get("uploader").is_none());
        assert!(value.get("http_headers").is_none());
    }

    #[test]
    fn playlist_serializes_with_type_tag() {
        let playlist = Playlist {
            id: "wombatpmv".to_string(),
            title: Some("wombatpmv's Profile".to_string()),
            extractor: "pmvhaven:profile".to_string(),
            entries: vec![],
        };
        let value = serde_json::to_value(Extracted::Playlist(playlist)).unwrap();
        assert_eq!(value["_type"], "playlist");
        assert_eq!(value["entries"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn primary_url_is_first_format() {
        let mut record = MediaRecord::default();
        assert!(!record.is_playable());
        assert_eq!(record.primary_url(), None);
        record.formats.push(Format::direct("https://a/1.mp4", "mp4"));
        record.formats.push(Format::direct("https://a/2.mp4", "mp4"));
        assert_eq!(record.primary_url(), Some("https://a/1.mp4"));
    }
}
