// ABOUTME: CLI for resolving media page URLs with mediaprobe-core.
// ABOUTME: Prints the resolved records as JSON; playlists are expanded unless --flat is given.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use mediaprobe_core::{Client, Extracted, Playlist};
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Resolve video page URLs into playable formats and metadata.
#[derive(Parser, Debug)]
#[command(name = "mediaprobe")]
#[command(about = "Resolve video page URLs and print JSON records", long_about = None)]
struct Args {
    /// Page URL(s) to resolve.
    #[arg(required = true)]
    urls: Vec<String>,

    /// List playlist entries without resolving each one.
    #[arg(long, default_value_t = false)]
    flat: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// User-Agent sent with every request.
    #[arg(long)]
    user_agent: Option<String>,

    /// Permit requests to loopback and private addresses.
    #[arg(long, default_value_t = false)]
    allow_private_networks: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut builder = Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .allow_private_networks(args.allow_private_networks);
    if let Some(ua) = &args.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    let client = builder.build().context("failed to build client")?;

    let mut results = Vec::new();
    for url in &args.urls {
        match process(&client, url, args.flat) {
            Ok(value) => results.push(json!({
                "url": url,
                "ok": true,
                "result": value,
                "error": null
            })),
            Err(err) => {
                warn!(%url, error = %err, "extraction failed");
                results.push(json!({
                    "url": url,
                    "ok": false,
                    "result": null,
                    "error": err.to_string()
                }));
            }
        }
    }

    let failed = results
        .iter()
        .filter(|r| r.get("ok").and_then(Value::as_bool) != Some(true))
        .count();

    // A single successful URL prints its record directly; anything else gets
    // the per-URL envelope.
    let output = match results.as_slice() {
        [only] if failed == 0 => only.get("result").cloned().unwrap_or(Value::Null),
        _ => Value::Array(results),
    };

    let rendered = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };

    match &args.output {
        Some(path) => fs::write(path, format!("{}\n", rendered))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", rendered),
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn process(client: &Client, url: &str, flat: bool) -> Result<Value> {
    match client.extract(url)? {
        Extracted::Playlist(playlist) if !flat => expand(client, &playlist),
        extracted => {
            serde_json::to_value(&extracted).context("failed to serialize extraction result")
        }
    }
}

/// Resolves every entry, skipping the ones that turn out to have no
/// playable stream.
fn expand(client: &Client, playlist: &Playlist) -> Result<Value> {
    let mut entries = Vec::new();
    for (entry, resolved) in playlist.entries.iter().zip(client.resolve_entries(playlist)) {
        match resolved {
            Ok(record) => entries.push(Extracted::Media(record)),
            Err(err) if err.is_expected() => {
                warn!(id = %entry.id, error = %err, "skipping entry");
            }
            Err(err) => return Err(err.into()),
        }
    }
    info!(
        playlist = %playlist.id,
        resolved = entries.len(),
        listed = playlist.entries.len(),
        "expanded playlist"
    );

    Ok(json!({
        "_type": "playlist",
        "id": playlist.id,
        "title": playlist.title,
        "extractor": playlist.extractor,
        "entries": serde_json::to_value(&entries).context("failed to serialize playlist entries")?,
    }))
}
