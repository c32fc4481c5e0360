//! Resolution of the language codes to download

use crate::client::LokaliseClient;
use crate::config::ALL_LANGUAGES;
use crate::error::Result;
use tracing::{debug, info};

/// Languages selected by the configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LanguageSelection {
    /// Every language of the project, fetched from Lokalise
    All,
    /// An explicit list, in configuration order
    Codes(Vec<String>),
}

impl LanguageSelection {
    /// Parse a raw `language_codes` setting.
    ///
    /// `None`, blank input and `*` select all languages. Anything else is split
    /// on commas; tokens are trimmed but otherwise kept verbatim, including
    /// duplicates and empty tokens.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_LANGUAGES) => LanguageSelection::All,
            Some(list) => {
                LanguageSelection::Codes(list.split(',').map(|t| t.trim().to_string()).collect())
            }
        }
    }
}

/// Turn a selection into concrete language codes.
///
/// Only [`LanguageSelection::All`] touches the network: one call to the
/// project's languages endpoint.
pub async fn resolve_languages(
    selection: LanguageSelection,
    client: &LokaliseClient,
) -> Result<Vec<String>> {
    match selection {
        LanguageSelection::Codes(codes) => {
            debug!(count = codes.len(), "using configured language codes");
            Ok(codes)
        }
        LanguageSelection::All => {
            info!("Fetching all language codes from Lokalise...");
            client.list_languages().await
        }
    }
}
