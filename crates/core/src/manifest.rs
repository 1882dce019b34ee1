// ABOUTME: Stream manifest resolution: turning a playlist URL (HLS) into concrete formats.
// ABOUTME: The default resolver defers variant expansion to the downloader.

use std::fmt;

use crate::error::ExtractError;
use crate::result::{Format, Protocol};

/// Expands a streaming manifest into the formats it offers.
pub trait ManifestResolver: fmt::Debug + Send + Sync {
    /// `ext` is the container the segments are expected to be remuxed into.
    fn expand(&self, manifest_url: &str, id: &str, ext: &str) -> Result<Vec<Format>, ExtractError>;
}

/// Emits the manifest itself as one `m3u8_native` format without fetching it.
///
/// HLS-aware downloaders pick a variant from the master playlist on their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredHls;

impl ManifestResolver for DeferredHls {
    fn expand(&self, manifest_url: &str, _id: &str, ext: &str) -> Result<Vec<Format>, ExtractError> {
        Ok(vec![Format {
            format_id: Some("hls".to_string()),
            url: manifest_url.to_string(),
            ext: ext.to_string(),
            protocol: Protocol::M3u8Native,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deferred_hls_emits_single_native_format() {
        let formats = DeferredHls
            .expand("https://cdn.example.com/master.m3u8", "abc", "mp4")
            .unwrap();
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].protocol, Protocol::M3u8Native);
        assert_eq!(formats[0].format_id.as_deref(), Some("hls"));
        assert_eq!(formats[0].url, "https://cdn.example.com/master.m3u8");
        assert_eq!(formats[0].ext, "mp4");
    }
}
