// ABOUTME: The mediaprobe Client: routes a URL to its site extractor and runs it.
// ABOUTME: Also resolves collection entries lazily, one reference at a time.

use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::error::ExtractError;
use crate::extractors::loader::load_builtin_registry;
use crate::extractors::registry::ExtractorRegistry;
use crate::extractors::ExtractContext;
use crate::manifest::{DeferredHls, ManifestResolver};
use crate::options::{ClientBuilder, Options};
use crate::resource::{FetchOptions, Fetcher, HttpFetcher};
use crate::result::{Extracted, MediaRecord, Playlist};

/// The main mediaprobe client.
#[derive(Debug, Clone)]
pub struct Client {
    fetcher: Arc<dyn Fetcher>,
    manifests: Arc<dyn ManifestResolver>,
    registry: ExtractorRegistry,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Result<Self, ExtractError> {
        let fetcher: Arc<dyn Fetcher> = match opts.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let fetch_opts = FetchOptions {
                    timeout: opts.timeout,
                    user_agent: opts.user_agent,
                    headers: opts.headers,
                    allow_private_networks: opts.allow_private_networks,
                };
                match opts.http_client {
                    Some(client) => Arc::new(HttpFetcher::with_client(client, fetch_opts)),
                    None => Arc::new(HttpFetcher::new(fetch_opts)?),
                }
            }
        };

        Ok(Self {
            fetcher,
            manifests: opts.manifests.unwrap_or_else(|| Arc::new(DeferredHls)),
            registry: opts.registry.unwrap_or_else(load_builtin_registry),
        })
    }

    /// Extracts whatever the URL points at: a media item or a collection.
    pub fn extract(&self, url: &str) -> Result<Extracted, ExtractError> {
        let parsed = parse_target(url)?;
        let extractor = self.registry.find(&parsed).ok_or_else(|| {
            ExtractError::unsupported(
                url,
                "Extract",
                Some(anyhow::anyhow!("no extractor matches this URL")),
            )
        })?;
        debug!(extractor = extractor.name(), %url, "dispatching");

        let ctx = ExtractContext {
            fetcher: self.fetcher.as_ref(),
            manifests: self.manifests.as_ref(),
        };
        extractor.extract(&ctx, &parsed)
    }

    /// Resolves a single media item.
    ///
    /// Collection URLs are rejected as unsupported.
    pub fn resolve(&self, url: &str) -> Result<MediaRecord, ExtractError> {
        match self.extract(url)? {
            Extracted::Media(record) => Ok(record),
            Extracted::Playlist(_) => Err(ExtractError::unsupported(
                url,
                "Resolve",
                Some(anyhow::anyhow!("URL is a collection, not a single item")),
            )),
        }
    }

    /// Lists a collection without resolving its entries.
    pub fn list_collection(&self, url: &str) -> Result<Playlist, ExtractError> {
        match self.extract(url)? {
            Extracted::Playlist(playlist) => Ok(playlist),
            Extracted::Media(_) => Err(ExtractError::unsupported(
                url,
                "ListCollection",
                Some(anyhow::anyhow!("URL is a single item, not a collection")),
            )),
        }
    }

    /// Resolves each entry of a playlist on demand, in order.
    ///
    /// An entry's uploader hint fills in a record that found no uploader.
    pub fn resolve_entries<'a>(
        &'a self,
        playlist: &'a Playlist,
    ) -> impl Iterator<Item = Result<MediaRecord, ExtractError>> + 'a {
        playlist.entries.iter().map(move |entry| {
            let mut record = self.resolve(&entry.url)?;
            if record.uploader.is_none() {
                record.uploader = entry.uploader.clone();
            }
            Ok(record)
        })
    }
}

fn parse_target(url: &str) -> Result<Url, ExtractError> {
    if url.trim().is_empty() {
        return Err(ExtractError::invalid_url(
            url,
            "Extract",
            Some(anyhow::anyhow!("empty URL")),
        ));
    }
    let parsed = Url::parse(url.trim()).map_err(|e| {
        ExtractError::invalid_url(url, "Extract", Some(anyhow::anyhow!("malformed URL: {}", e)))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ExtractError::invalid_url(
            url,
            "Extract",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }
    Ok(parsed)
}
