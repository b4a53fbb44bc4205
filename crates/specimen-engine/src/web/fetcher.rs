//! Per-species web lookup
//!
//! Builds the lookup URL from the species name tokens, issues a single
//! HTTP GET and runs the heuristic extractors over the response body.
//! A failed fetch degrades that species to an extract synthesized from
//! the query tokens; it is logged but never raised.

use super::extract::Extractor;
use specimen_common::types::{split_species_name, WebExtract};
use specimen_common::{Result, SpecimenError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Base path of the taxonomic lookup site
pub const DEFAULT_BASE_URL: &str = "http://frps.eflora.cn/frps/";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetcher configuration
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Base path the encoded genus/species pair is appended to
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Web enrichment fetcher
pub struct Fetcher {
    client: reqwest::Client,
    base_url: String,
    extractor: Extractor,
}

impl Fetcher {
    /// Build the HTTP client and compile the extraction rules once.
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("specimen-pipeline/0.1")
            .build()
            .map_err(|e| SpecimenError::network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url,
            extractor: Extractor::new()?,
        })
    }

    /// Lookup URL for a normalized species name: base path plus the
    /// URL-encoded genus, `%20`, and the URL-encoded species part.
    pub fn lookup_url(&self, genus: &str, species: &str) -> String {
        format!(
            "{}{}%20{}",
            self.base_url,
            urlencoding::encode(genus),
            urlencoding::encode(species)
        )
    }

    /// Fetch and extract the web record for one species name.
    ///
    /// Connection or HTTP failures yield an extract carrying only the
    /// name tokens, with an error log entry; the run continues.
    pub async fn fetch(&self, species_name: &str) -> WebExtract {
        info!(species = %species_name, "Looking up species");

        let (genus, species) = split_species_name(species_name);
        if species_name.split_whitespace().count() != 2 {
            warn!(species = %species_name, "Species name is not a plain binomial");
        }

        let url = self.lookup_url(&genus, &species);
        debug!(url = %url, "Requesting species page");

        let html = match self.get_page(&url).await {
            Ok(html) => html,
            Err(e) => {
                error!(species = %species_name, error = %e, "Web lookup failed, using blank extract");
                return WebExtract::from_species_tokens(species_name);
            }
        };

        self.extract(&html, genus, species, species_name)
    }

    async fn get_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SpecimenError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SpecimenError::network(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SpecimenError::network(e.to_string()))
    }

    /// Run the extractors over a fetched page body.
    fn extract(&self, html: &str, genus: String, species: String, species_name: &str) -> WebExtract {
        let namer = match self.extractor.extract_namer(html, &genus, &species) {
            Some(namer) => namer,
            None => {
                warn!(species = %species_name, "Cannot find namer marker on page");
                String::new()
            }
        };

        let fields = self.extractor.extract_morphology(html);

        WebExtract {
            genus,
            species,
            namer,
            // The site has no stable marker for 生境 text
            habitat: String::new(),
            body_height: fields.body_height,
            dbh: fields.dbh,
            stem: fields.stem,
            leaf: fields.leaf,
            flower: fields.flower,
            fruit: fields.fruit,
            host: fields.host,
        }
    }
}
