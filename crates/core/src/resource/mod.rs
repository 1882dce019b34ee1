// ABOUTME: Page/JSON fetching: the Fetcher trait extractors depend on and its blocking HTTP implementation.
// ABOUTME: Handles SSRF protection, content-length limits, charset decoding, and JSON bodies.

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, ToSocketAddrs};
use std::time::Duration;

use bytes::Bytes;
use ipnet::IpNet;
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ExtractError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

static PRIVATE_NETS: Lazy<Vec<IpNet>> = Lazy::new(|| {
    [
        "0.0.0.0/8",
        "10.0.0.0/8",
        "127.0.0.0/8",
        "169.254.0.0/16",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "::1/128",
        "fc00::/7",
        "fe80::/10",
    ]
    .iter()
    .map(|net| net.parse().unwrap())
    .collect()
});

/// HTTP method for JSON requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

/// Shape of a JSON API request.
#[derive(Debug, Clone, Default)]
pub struct JsonRequest {
    pub method: Method,
    pub body: Option<String>,
    pub headers: HashMap<String, String>,
}

impl JsonRequest {
    /// A POST request carrying `body` verbatim.
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            body: Some(body.into()),
            headers: HashMap::new(),
        }
    }

    /// Adds a request header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// Retrieves pages and JSON documents on behalf of extractors.
///
/// `id` names the item the request is made for and is used as the error
/// target and in log lines.
pub trait Fetcher: fmt::Debug + Send + Sync {
    fn fetch_text(&self, url: &str, id: &str) -> Result<String, ExtractError>;

    fn fetch_json(&self, url: &str, id: &str, req: &JsonRequest) -> Result<Value, ExtractError>;
}

/// Check if an IP address is in a private/reserved range.
pub fn is_private_ip(addr: &IpAddr) -> bool {
    PRIVATE_NETS.iter().any(|net| net.contains(addr))
}

/// Returns an error message if `url` points at a private or loopback host.
///
/// Hosts that fail to resolve pass; the request itself reports that failure.
fn private_host_reason(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = host.parse::<IpAddr>() {
        return is_private_ip(&ip).then(|| "private IP addresses are not allowed".to_string());
    }

    let port = url.port_or_known_default().unwrap_or(80);
    match (host, port).to_socket_addrs() {
        Ok(mut addrs) => addrs
            .any(|sa| is_private_ip(&sa.ip()))
            .then(|| "host resolves to a private IP address".to_string()),
        Err(_) => None,
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(charset) = content_type.and_then(extract_charset) {
        if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
            let (decoded, _, _) = encoding.decode(body);
            return decoded.into_owned();
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type.to_lowercase().split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|cs| cs.trim_matches('"').trim_matches('\'').to_string())
    })
}

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "mediaprobe/0.1".to_string(),
            headers: HashMap::new(),
            allow_private_networks: false,
        }
    }
}

/// Blocking HTTP fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    opts: FetchOptions,
}

struct RawResponse {
    content_type: Option<String>,
    body: Bytes,
}

impl HttpFetcher {
    /// Builds a fetcher with its own HTTP client.
    pub fn new(opts: FetchOptions) -> Result<Self, ExtractError> {
        let allow_private = opts.allow_private_networks;
        let redirect_policy = reqwest::redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= 10 {
                return attempt.error("too many redirects");
            }
            if !allow_private {
                if let Some(reason) = private_host_reason(attempt.url()) {
                    return attempt.error(format!("redirect blocked: {}", reason));
                }
            }
            attempt.follow()
        });

        let client = reqwest::blocking::Client::builder()
            .redirect(redirect_policy)
            .user_agent(&opts.user_agent)
            .timeout(opts.timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| {
                ExtractError::fetch(
                    "",
                    "BuildClient",
                    Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                )
            })?;

        Ok(Self { client, opts })
    }

    /// Wraps an existing client; `opts.timeout` and `opts.user_agent` are
    /// then whatever that client was configured with.
    pub fn with_client(client: reqwest::blocking::Client, opts: FetchOptions) -> Self {
        Self { client, opts }
    }

    fn check_target(&self, url: &str, id: &str, op: &str) -> Result<Url, ExtractError> {
        let parsed = Url::parse(url).map_err(|e| {
            ExtractError::invalid_url(id, op, Some(anyhow::anyhow!("{}: {}", url, e)))
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ExtractError::invalid_url(
                id,
                op,
                Some(anyhow::anyhow!("{}: scheme must be http or https", url)),
            ));
        }

        if !self.opts.allow_private_networks {
            if let Some(reason) = private_host_reason(&parsed) {
                return Err(ExtractError::ssrf(
                    id,
                    op,
                    Some(anyhow::anyhow!("{}: {}", url, reason)),
                ));
            }
        }

        Ok(parsed)
    }

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        url: &str,
        id: &str,
        op: &str,
    ) -> Result<RawResponse, ExtractError> {
        let mut request = request;
        for (key, value) in &self.opts.headers {
            request = request.header(key, value);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                ExtractError::timeout(id, op, Some(anyhow::anyhow!("{}: {}", url, e)))
            } else {
                ExtractError::fetch(id, op, Some(anyhow::anyhow!("{}: request failed: {}", url, e)))
            }
        })?;

        if let Some(len) = response.content_length() {
            if len as usize > MAX_CONTENT_LENGTH {
                return Err(ExtractError::fetch(
                    id,
                    op,
                    Some(anyhow::anyhow!("{}: content too large", url)),
                ));
            }
        }

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_lowercase());

        let body = response.bytes().map_err(|e| {
            ExtractError::fetch(
                id,
                op,
                Some(anyhow::anyhow!("{}: failed to read body: {}", url, e)),
            )
        })?;

        if body.len() > MAX_CONTENT_LENGTH {
            return Err(ExtractError::fetch(
                id,
                op,
                Some(anyhow::anyhow!("{}: content too large", url)),
            ));
        }

        if !status.is_success() {
            return Err(ExtractError::fetch(
                id,
                op,
                Some(anyhow::anyhow!("{}: HTTP status {}", url, status.as_u16())),
            ));
        }

        Ok(RawResponse { content_type, body })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &str, id: &str) -> Result<String, ExtractError> {
        let op = "FetchText";
        self.check_target(url, id, op)?;
        debug!(%url, %id, "downloading webpage");

        let raw = self.send(self.client.get(url), url, id, op)?;
        Ok(decode_body(&raw.body, raw.content_type.as_deref()))
    }

    fn fetch_json(&self, url: &str, id: &str, req: &JsonRequest) -> Result<Value, ExtractError> {
        let op = "FetchJson";
        self.check_target(url, id, op)?;
        debug!(%url, %id, method = ?req.method, "downloading JSON");

        let mut request = match req.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        request = request.header(reqwest::header::ACCEPT, "application/json");
        for (key, value) in &req.headers {
            request = request.header(key, value);
        }
        if let Some(body) = &req.body {
            request = request.body(body.clone());
        }

        let raw = self.send(request, url, id, op)?;
        let text = decode_body(&raw.body, raw.content_type.as_deref());
        serde_json::from_str(&text).map_err(|e| {
            ExtractError::fetch(
                id,
                op,
                Some(anyhow::anyhow!("{}: invalid JSON: {}", url, e)),
            )
        })
    }
}
