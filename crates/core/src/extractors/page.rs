// ABOUTME: Lazily downloaded human-facing page shared by the stream chain and the metadata chains.
// ABOUTME: The page is fetched at most once, and only when a strategy actually needs the markup.

use once_cell::unsync::OnceCell;
use scraper::Html;
use url::Url;

use crate::error::ExtractError;
use crate::resource::Fetcher;

/// The HTML page behind a media URL.
pub struct Webpage<'a> {
    url: &'a Url,
    id: &'a str,
    fetcher: &'a dyn Fetcher,
    html: OnceCell<String>,
    doc: OnceCell<Html>,
}

impl<'a> Webpage<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, url: &'a Url, id: &'a str) -> Self {
        Self {
            url,
            id,
            fetcher,
            html: OnceCell::new(),
            doc: OnceCell::new(),
        }
    }

    /// URL the page lives at.
    pub fn url(&self) -> &Url {
        self.url
    }

    /// Raw markup, downloading it on first use.
    pub fn html(&self) -> Result<&str, ExtractError> {
        self.html
            .get_or_try_init(|| self.fetcher.fetch_text(self.url.as_str(), self.id))
            .map(String::as_str)
    }

    /// Raw markup if it has already been downloaded.
    pub fn loaded_html(&self) -> Option<&str> {
        self.html.get().map(String::as_str)
    }

    /// Parsed document if the markup has already been downloaded.
    ///
    /// Never triggers a download.
    pub fn loaded_document(&self) -> Option<&Html> {
        let html = self.loaded_html()?;
        Some(self.doc.get_or_init(|| Html::parse_document(html)))
    }

    /// Returns true once the markup has been downloaded.
    pub fn is_loaded(&self) -> bool {
        self.html.get().is_some()
    }
}
