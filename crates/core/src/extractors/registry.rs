// ABOUTME: Registry mapping hosts to the site extractors that serve them.
// ABOUTME: Several extractors may share a host; the first whose URL pattern matches wins.

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use crate::extractors::SiteExtractor;
use crate::url_utils::bare_host;

/// Registry for looking up extractors by URL.
#[derive(Debug, Default, Clone)]
pub struct ExtractorRegistry {
    map: HashMap<String, Vec<Arc<dyn SiteExtractor>>>,
}

impl ExtractorRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extractor under every host it serves, after any
    /// extractor already registered for that host.
    pub fn register<E: SiteExtractor + 'static>(&mut self, extractor: E) {
        let shared: Arc<dyn SiteExtractor> = Arc::new(extractor);
        for domain in shared.domains() {
            let key = domain
                .to_lowercase()
                .trim_start_matches("www.")
                .to_string();
            self.map.entry(key).or_default().push(Arc::clone(&shared));
        }
    }

    /// Finds the extractor for a URL: host lookup, then the first suitable one.
    pub fn find(&self, url: &Url) -> Option<&dyn SiteExtractor> {
        let host = bare_host(url)?;
        self.map
            .get(&host)?
            .iter()
            .find(|e| e.suitable(url))
            .map(|e| e.as_ref())
    }

    /// Returns the number of registered host mappings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no extractors are registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
