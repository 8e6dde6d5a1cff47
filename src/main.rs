//! Notefile - inspect how a document handle sees a file
//!
//! Opens the given file as an orphan document and prints its kind, where its
//! relative links resolve, its image folder and the images it references.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use notefile::{FileHandle, HandleConfig, LocalDisk};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    let arg = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: notefile <path>")?;
    // Handles expect existing absolute paths
    let path = std::fs::canonicalize(&arg)
        .with_context(|| format!("Cannot access {}", arg.display()))?;

    let config = HandleConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Using default config: {:#}", e);
        HandleConfig::default()
    });

    let mut handle = FileHandle::orphan(path, &config, Arc::new(LocalDisk));
    handle.open()?;

    println!("{} ({})", handle.title(), handle.document_kind());
    println!("path:         {}", handle.fetch_path().display());
    println!("base url:     {}", handle.base_url());
    println!("image folder: {}", handle.fetch_image_folder_path().display());

    for link in handle.image_links() {
        let marker = if link.is_internal() { "internal" } else { "external" };
        println!("  [{marker}] {} ({:?})", link.url, link.kind);
    }

    handle.close();
    Ok(())
}
