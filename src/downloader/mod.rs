//! Download pipeline: resolve languages, request a bundle, extract it.
//!
//! [`TranslationDownloader`] runs the three steps strictly in sequence. In
//! [`FetchMode::Batch`] all languages share one export request and one archive;
//! in [`FetchMode::PerLanguage`] each language gets its own request, download
//! and extraction, one after the other.


use crate::client::LokaliseClient;
use crate::config::{Config, FetchMode};
use crate::error::{Error, Result};
use crate::extraction::{BundleExtractor, extract_bundle};
use crate::languages::{LanguageSelection, resolve_languages};
use crate::types::{DownloadReport, ExtractedFile};
use tracing::{debug, error, info};

/// Downloads Lokalise translations into `.properties` files
pub struct TranslationDownloader {
    config: Config,
    client: LokaliseClient,
}

impl TranslationDownloader {
    /// Validate `config` and prepare the HTTP client
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = LokaliseClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Run the whole download.
    ///
    /// Any failure aborts the run and is returned as
    /// [`Error::DownloadFailed`] with the original cause attached. Files
    /// written before the failure are left in place.
    pub async fn run(&self) -> Result<DownloadReport> {
        self.run_pipeline().await.map_err(|e| {
            error!(error = %e, "Lokalise download failed");
            Error::download_failed(e)
        })
    }

    async fn run_pipeline(&self) -> Result<DownloadReport> {
        let selection = LanguageSelection::parse(self.config.language_codes.as_deref());
        let languages = resolve_languages(selection, &self.client).await?;

        info!("Requesting Lokalise bundle for languages: {:?}", languages);

        let files = match self.config.fetch_mode {
            FetchMode::Batch => self.fetch_and_extract(&languages).await?,
            FetchMode::PerLanguage => {
                let mut files = Vec::new();
                for language in &languages {
                    debug!(language = %language, "requesting single-language bundle");
                    files.extend(self.fetch_and_extract(std::slice::from_ref(language)).await?);
                }
                files
            }
        };

        info!(
            languages = languages.len(),
            files = files.len(),
            output_dir = ?self.config.output_dir,
            "Lokalise download complete"
        );

        Ok(DownloadReport { languages, files })
    }

    /// One request/download/extract cycle for `languages`
    async fn fetch_and_extract(&self, languages: &[String]) -> Result<Vec<ExtractedFile>> {
        let bundle_url = self
            .client
            .request_bundle(languages, &self.config.export)
            .await?;

        let archive = self.client.download_bundle(&bundle_url).await?;

        let extractor =
            BundleExtractor::new(&self.config.output_dir, self.config.file_prefix.as_str());
        debug!(
            bytes = archive.len(),
            output_dir = ?extractor.output_dir(),
            "extracting bundle"
        );
        extract_bundle(extractor, archive).await
    }
}
