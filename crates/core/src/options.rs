// ABOUTME: Configuration options for mediaprobe including Options and ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::client::Client;
use crate::error::ExtractError;
use crate::extractors::registry::ExtractorRegistry;
use crate::manifest::ManifestResolver;
use crate::resource::Fetcher;

/// Configuration options for the mediaprobe client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub allow_private_networks: bool,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::blocking::Client>,
    pub registry: Option<ExtractorRegistry>,
    /// Replaces the HTTP fetcher entirely; network settings above are then unused.
    pub fetcher: Option<Arc<dyn Fetcher>>,
    pub manifests: Option<Arc<dyn ManifestResolver>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "mediaprobe/0.1".to_string(),
            allow_private_networks: false,
            headers: HashMap::new(),
            http_client: None,
            registry: None,
            fetcher: None,
            manifests: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Set a custom extractor registry.
    pub fn registry(mut self, reg: ExtractorRegistry) -> Self {
        self.opts.registry = Some(reg);
        self
    }

    /// Use a custom page/JSON fetcher.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.opts.fetcher = Some(fetcher);
        self
    }

    /// Use a custom manifest resolver.
    pub fn manifests(mut self, resolver: Arc<dyn ManifestResolver>) -> Self {
        self.opts.manifests = Some(resolver);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Result<Client, ExtractError> {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
