//! HTTP client for the Lokalise API
//!
//! Wraps the three requests a download needs: listing project languages,
//! requesting an export bundle, and fetching the bundle archive. Every API call
//! carries the static `X-Api-Token` header; error statuses are logged with their
//! body and surfaced as [`Error::Api`].

use crate::config::{Config, ExportOptions};
use crate::error::{Error, Result};
use crate::types::{BundleResponse, ExportRequest, LanguagesResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, error};
use url::Url;

/// Header carrying the Lokalise API token
pub const TOKEN_HEADER: &str = "X-Api-Token";

const JSON: &str = "application/json";

/// Client bound to one Lokalise project
pub struct LokaliseClient {
    http: reqwest::Client,
    base_url: Url,
    project_id: String,
    api_token: String,
}

impl LokaliseClient {
    /// Create a client for the project and credentials in `config`
    ///
    /// # Errors
    /// Returns a configuration error for an unusable `api_url`, or an error if
    /// the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.api_url).map_err(|e| {
            Error::config("api_url", format!("invalid api_url '{}': {}", config.api_url, e))
        })?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("lokalise-dl/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            project_id: config.project_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// ISO codes of every language in the project, in the order Lokalise returns them
    pub async fn list_languages(&self) -> Result<Vec<String>> {
        let url = self.project_endpoint(&["languages"])?;
        debug!(%url, "listing project languages");

        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, &self.api_token)
            .header(CONTENT_TYPE, JSON)
            .send()
            .await?;
        let response = check_status(response).await?;

        let body = response.bytes().await?;
        let languages: LanguagesResponse = serde_json::from_slice(&body)?;
        Ok(languages.iso_codes())
    }

    /// Ask Lokalise to build a `.properties` bundle for `languages`.
    ///
    /// Returns the bundle download URL. A response without `bundle_url` is an
    /// [`Error::MissingField`].
    pub async fn request_bundle(
        &self,
        languages: &[String],
        options: &ExportOptions,
    ) -> Result<String> {
        let url = self.project_endpoint(&["files", "download"])?;
        debug!(%url, ?languages, "requesting export bundle");

        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, &self.api_token)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .json(&ExportRequest::new(languages, options))
            .send()
            .await?;
        let response = check_status(response).await?;

        let body = response.bytes().await?;
        let bundle: BundleResponse = serde_json::from_slice(&body)?;
        bundle.into_url()
    }

    /// Download the archive behind a bundle URL
    pub async fn download_bundle(&self, bundle_url: &str) -> Result<Vec<u8>> {
        debug!(url = %bundle_url, "downloading bundle");

        let response = self.http.get(bundle_url).send().await?;
        let response = check_status(response).await?;

        let archive = response.bytes().await?;
        debug!(bytes = archive.len(), "bundle downloaded");
        Ok(archive.to_vec())
    }

    fn project_endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::config(
                    "api_url",
                    format!("api_url '{}' cannot be used as a base URL", self.base_url),
                )
            })?
            .pop_if_empty()
            .push("projects")
            .push(&self.project_id)
            .extend(segments);
        Ok(url)
    }
}

/// Pass successful responses through; log and convert HTTP >= 400 into [`Error::Api`]
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    error!(status = status.as_u16(), %url, "Lokalise API error: {}", body);

    Err(Error::Api {
        status: status.as_u16(),
        body,
    })
}
