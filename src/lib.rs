//! # lokalise-dl
//!
//! Downloads translations from a [Lokalise](https://lokalise.com) project and
//! writes them as per-language `.properties` files.
//!
//! A run has three sequential steps:
//! 1. resolve the language codes (explicit list, or every project language),
//! 2. request a `.properties` export bundle for those languages,
//! 3. download the ZIP bundle and write `<prefix><code>.properties` for every
//!    file in it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lokalise_dl::{Config, TranslationDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::new("api-token", "123456789.abcdef");
//!     config.language_codes = Some("de,en,fr".to_string());
//!     config.file_prefix = "messages_".to_string();
//!
//!     let report = TranslationDownloader::new(config)?.run().await?;
//!     for file in &report.files {
//!         println!("{} -> {}", file.language, file.path.display());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! From a build script, where no async runtime is available:
//!
//! ```no_run
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = lokalise_dl::Config::from_env()?;
//!     lokalise_dl::download_translations_blocking(config)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Lokalise API client
pub mod client;
/// Configuration types
pub mod config;
/// Download pipeline
pub mod downloader;
/// Error types
pub mod error;
/// Bundle extraction
pub mod extraction;
/// Language code resolution
pub mod languages;
/// Wire types and run results
pub mod types;

// Re-export commonly used types
pub use client::LokaliseClient;
pub use config::{Config, ExportOptions, FetchMode};
pub use downloader::TranslationDownloader;
pub use error::{Error, ErrorKind, Result};
pub use extraction::BundleExtractor;
pub use languages::LanguageSelection;
pub use types::{DownloadReport, ExtractedFile};

/// Run a complete download with `config`.
///
/// Shorthand for `TranslationDownloader::new(config)?.run().await`.
pub async fn download_translations(config: Config) -> Result<DownloadReport> {
    TranslationDownloader::new(config)?.run().await
}

/// Blocking variant of [`download_translations`] for synchronous hosts such as
/// build scripts.
///
/// Builds a current-thread tokio runtime for the duration of the call. Called
/// from within a tokio runtime it returns [`Error::Other`]; use
/// [`download_translations`] there instead.
pub fn download_translations_blocking(config: Config) -> Result<DownloadReport> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(Error::Other(
            "download_translations_blocking called from within an async runtime".to_string(),
        ));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {}", e)))?;

    runtime.block_on(download_translations(config))
}
