// ABOUTME: In-memory Fetcher for unit tests: canned pages plus a scripted JSON handler.
// ABOUTME: Records every request so tests can assert on fetch order and count.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::ExtractError;
use crate::resource::{Fetcher, JsonRequest};

type JsonHandler = Box<dyn Fn(&str, &JsonRequest) -> Result<Value, ExtractError> + Send + Sync>;

#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    json: Option<JsonHandler>,
    text_calls: AtomicUsize,
    json_requests: Mutex<Vec<(String, Option<String>)>>,
}

impl std::fmt::Debug for StaticFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticFetcher")
            .field("pages", &self.pages.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl StaticFetcher {
    pub fn with_text(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn with_json<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &JsonRequest) -> Result<Value, ExtractError> + Send + Sync + 'static,
    {
        self.json = Some(Box::new(handler));
        self
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    /// `(url, body)` of every JSON request, in order.
    pub fn json_requests(&self) -> Vec<(String, Option<String>)> {
        self.json_requests.lock().unwrap().clone()
    }
}

impl Fetcher for StaticFetcher {
    fn fetch_text(&self, url: &str, id: &str) -> Result<String, ExtractError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or_else(|| {
            ExtractError::fetch(id, "FetchText", Some(anyhow::anyhow!("{}: HTTP status 404", url)))
        })
    }

    fn fetch_json(&self, url: &str, id: &str, req: &JsonRequest) -> Result<Value, ExtractError> {
        self.json_requests
            .lock()
            .unwrap()
            .push((url.to_string(), req.body.clone()));
        match &self.json {
            Some(handler) => handler(url, req),
            None => Err(ExtractError::fetch(
                id,
                "FetchJson",
                Some(anyhow::anyhow!("{}: HTTP status 404", url)),
            )),
        }
    }
}
