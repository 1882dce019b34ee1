// ABOUTME: Site extractors and the building blocks they share.
// ABOUTME: Defines the SiteExtractor trait, the per-call ExtractContext, and title normalization.

//! Site extraction module.
//!
//! Submodules:
//! - `stream`: ordered stream-URL strategies and format construction.
//! - `page`: the lazily downloaded human-facing page.
//! - `meta`, `markup`, `payload`: field readers for meta tags, raw markup
//!   patterns and JSON payloads.
//! - `registry`, `loader`: host-based lookup of extractors.
//! - `pmvhaven`, `kbjfan`: the site implementations.

use std::fmt;

use url::Url;

use crate::error::ExtractError;
use crate::manifest::ManifestResolver;
use crate::resource::Fetcher;
use crate::result::Extracted;

pub mod kbjfan;
pub mod loader;
pub mod markup;
pub mod meta;
pub mod page;
pub mod payload;
pub mod pmvhaven;
pub mod registry;
pub mod stream;

#[cfg(test)]
pub(crate) mod testing;

/// Collaborators an extractor may use during one call.
#[derive(Clone, Copy)]
pub struct ExtractContext<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub manifests: &'a dyn ManifestResolver,
}

/// A site-specific extractor.
///
/// Implementations hold no per-call state; each `extract` call is independent.
pub trait SiteExtractor: fmt::Debug + Send + Sync {
    /// Stable name reported in output records, e.g. `pmvhaven`.
    fn name(&self) -> &'static str;

    /// Hosts (without `www.`) this extractor serves.
    fn domains(&self) -> Vec<String>;

    /// Returns true if the URL has the shape this extractor understands.
    fn suitable(&self, url: &Url) -> bool;

    fn extract(&self, ctx: &ExtractContext<'_>, url: &Url) -> Result<Extracted, ExtractError>;
}

/// Removes a trailing site-name suffix such as `" - SiteName"` and trims.
pub fn strip_site_suffix(title: &str, suffix: &str) -> String {
    let trimmed = title.trim();
    trimmed
        .strip_suffix(suffix)
        .or_else(|| trimmed.strip_suffix(suffix.trim()))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strip_site_suffix_removes_known_suffix() {
        assert_eq!(
            strip_site_suffix("Example Title - SiteName", " - SiteName"),
            "Example Title"
        );
        assert_eq!(
            strip_site_suffix("  Example Title - SiteName  ", " - SiteName"),
            "Example Title"
        );
    }

    #[test]
    fn strip_site_suffix_leaves_other_titles() {
        assert_eq!(strip_site_suffix("Plain", " - SiteName"), "Plain");
        assert_eq!(
            strip_site_suffix("SiteName - Intro", " - SiteName"),
            "SiteName - Intro"
        );
    }
}
