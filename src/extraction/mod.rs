//! Bundle extraction
//!
//! Lokalise delivers translations as a ZIP bundle with one `<code>.properties`
//! entry per language. This module reads that archive and writes every file
//! entry flat into the output directory as `<prefix><code>.properties`.

mod zip;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use self::zip::BundleExtractor;

use crate::error::{Error, Result};
use crate::types::{ExtractedFile, PROPERTIES_EXTENSION};
use std::io::Cursor;
use tokio::task::spawn_blocking;

/// Derive the language code from an archive entry name.
///
/// Only the final path segment counts, so `locale/de.properties` and
/// `de.properties` both yield `de`. Names without the `.properties` suffix, or
/// with nothing in front of it, are rejected as [`Error::UnsupportedEntry`].
pub fn language_code_from_entry(entry_name: &str) -> Result<String> {
    let file_name = entry_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entry_name);

    match file_name.strip_suffix(PROPERTIES_EXTENSION) {
        Some(code) if !code.is_empty() => Ok(code.to_string()),
        _ => Err(Error::UnsupportedEntry {
            name: entry_name.to_string(),
        }),
    }
}

/// Output file name for a language: `<prefix><code>.properties`
pub fn output_file_name(prefix: &str, language: &str) -> String {
    format!("{}{}{}", prefix, language, PROPERTIES_EXTENSION)
}

/// Extract a downloaded bundle on a blocking worker thread.
///
/// The archive bytes are moved into the worker; the call resolves once every
/// entry has been written.
pub async fn extract_bundle(
    extractor: BundleExtractor,
    archive: Vec<u8>,
) -> Result<Vec<ExtractedFile>> {
    spawn_blocking(move || extractor.extract(Cursor::new(archive)))
        .await
        .map_err(|e| Error::Other(format!("extraction task panicked: {}", e)))?
}
