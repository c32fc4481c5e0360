//! Wire types for the Lokalise API and results of a download run

use crate::config::ExportOptions;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Export format requested from Lokalise
pub const PROPERTIES_FORMAT: &str = "properties";

/// Extension of every exported and written file
pub const PROPERTIES_EXTENSION: &str = ".properties";

/// Bundle layout: one file per language, named after its ISO code
pub const BUNDLE_STRUCTURE: &str = "%LANG_ISO%";

/// Response of `GET /projects/{id}/languages`
#[derive(Clone, Debug, Deserialize)]
pub struct LanguagesResponse {
    /// Project languages in the order Lokalise lists them
    pub languages: Vec<Language>,
}

/// A single project language; only the ISO code is used
#[derive(Clone, Debug, Deserialize)]
pub struct Language {
    /// Language code, e.g. "de" or "en_US"
    pub lang_iso: String,
}

impl LanguagesResponse {
    /// ISO codes of all languages, in response order
    pub fn iso_codes(self) -> Vec<String> {
        self.languages.into_iter().map(|l| l.lang_iso).collect()
    }
}

/// Body of `POST /projects/{id}/files/download`
#[derive(Clone, Debug, Serialize)]
pub struct ExportRequest<'a> {
    /// Always [`PROPERTIES_FORMAT`]
    pub format: &'static str,
    /// Always false so entries are named by the bundle structure
    pub original_filenames: bool,
    /// Always [`BUNDLE_STRUCTURE`]
    pub bundle_structure: &'static str,
    /// Include keys of every platform
    pub all_platforms: bool,
    /// Plural form encoding
    pub plural_format: &'a str,
    /// Placeholder syntax
    pub placeholder_format: &'a str,
    /// Languages to export
    pub filter_langs: &'a [String],
}

impl<'a> ExportRequest<'a> {
    /// Build the export request for `languages`
    pub fn new(languages: &'a [String], options: &'a ExportOptions) -> Self {
        Self {
            format: PROPERTIES_FORMAT,
            original_filenames: false,
            bundle_structure: BUNDLE_STRUCTURE,
            all_platforms: options.all_platforms,
            plural_format: &options.plural_format,
            placeholder_format: &options.placeholder_format,
            filter_langs: languages,
        }
    }
}

/// Response of the export request
#[derive(Clone, Debug, Deserialize)]
pub struct BundleResponse {
    /// Presigned URL of the ZIP bundle
    #[serde(default)]
    pub bundle_url: Option<String>,
}

impl BundleResponse {
    /// The bundle URL, or [`Error::MissingField`] if Lokalise did not return one
    pub fn into_url(self) -> Result<String> {
        self.bundle_url.ok_or(Error::MissingField {
            field: "bundle_url",
        })
    }
}

/// A `.properties` file written to the output directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Language code derived from the archive entry
    pub language: String,
    /// Absolute path of the written file
    pub path: PathBuf,
}

/// Outcome of a successful download run
#[derive(Clone, Debug, Default)]
pub struct DownloadReport {
    /// Languages that were requested
    pub languages: Vec<String>,
    /// Files written, in the order they were extracted
    pub files: Vec<ExtractedFile>,
}
