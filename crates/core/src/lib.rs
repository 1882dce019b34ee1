// ABOUTME: Main library entry point for mediaprobe, a site-specific media metadata extractor.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, Options, records, errors, and extractor traits.

//! mediaprobe - resolves video page URLs into playable formats and metadata.
//!
//! Each supported site has an extractor that locates a stream URL through an
//! ordered chain of strategies and fills auxiliary fields (title, uploader,
//! dates, duration, ...) from independent fallback chains. Collection pages
//! are listed as unresolved references that can be resolved on demand.
//!
//! # Example
//!
//! ```no_run
//! use mediaprobe_core::{Client, ExtractError};
//!
//! fn main() -> Result<(), ExtractError> {
//!     let client = Client::builder().build()?;
//!     let record = client.resolve("https://pmvhaven.com/video/NEW-RULES_66799ca1ca817a3e12107c75")?;
//!     println!("{} -> {:?}", record.title, record.primary_url());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod duration_parse;
pub mod error;
pub mod extractors;
pub mod html_utils;
pub mod manifest;
pub mod options;
pub mod resource;
pub mod result;
pub mod time_parse;
pub mod url_utils;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, ExtractError};
pub use crate::extractors::loader::load_builtin_registry;
pub use crate::extractors::registry::ExtractorRegistry;
pub use crate::extractors::{ExtractContext, SiteExtractor};
pub use crate::manifest::{DeferredHls, ManifestResolver};
pub use crate::options::{ClientBuilder, Options};
pub use crate::resource::{FetchOptions, Fetcher, HttpFetcher, JsonRequest, Method};
pub use crate::result::{CollectionRef, Extracted, Format, MediaRecord, Playlist, Protocol};
