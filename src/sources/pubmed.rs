//! PubMed research source implementation using E-utilities API.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{PaperId, RawRecord};
use crate::sources::{Source, SourceError};
use crate::utils::{with_retry, HttpClient, RetryConfig};

/// PubMed E-utilities API base URL
pub const PUBMED_EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Page size requested from esearch unless configured otherwise
const DEFAULT_MAX_RESULTS: usize = 50;

/// PubMed research source
///
/// Uses NCBI E-utilities: `esearch` (JSON) for identifiers and `efetch` (XML)
/// for full records. Records are handed back as unparsed text.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: Arc<HttpClient>,
    base_url: String,
    max_results: usize,
    api_key: Option<String>,
    email: Option<String>,
    tool: Option<String>,
    retry: RetryConfig,
}

impl PubMedSource {
    /// Create a new PubMed source with default settings
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(
            Arc::new(HttpClient::new()?),
            PUBMED_EUTILS_BASE_URL,
        ))
    }

    /// Create a source from application configuration
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = Arc::new(HttpClient::from_config(&config.http)?);
        let mut source = Self::with_client(client, config.pubmed.base_url.as_str())
            .max_results(config.pubmed.max_results)
            .retry(RetryConfig::from(&config.retry));
        source.api_key = config.pubmed.api_key.clone();
        source.email = config.pubmed.email.clone();
        source.tool = config.pubmed.tool.clone();
        Ok(source)
    }

    /// Create with a custom HTTP client and base URL (for testing)
    pub fn with_client(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            api_key: None,
            email: None,
            tool: None,
            retry: RetryConfig::default(),
        }
    }

    /// Set the esearch page size
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the retry policy for both calls
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the NCBI API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Parameters NCBI asks every E-utilities request to carry
    fn etiquette_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(tool) = &self.tool {
            params.push(("tool", tool.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email", email.clone()));
        }
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    fn encode_params(params: &[(&str, String)]) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Build E-utilities search URL
    fn build_search_url(&self, query: &str) -> String {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmode", "json".to_string()),
            ("retmax", self.max_results.to_string()),
        ];
        params.extend(self.etiquette_params());

        format!(
            "{}/esearch.fcgi?{}",
            self.base_url,
            Self::encode_params(&params)
        )
    }

    /// Build E-utilities fetch URL for one PubMed ID
    fn build_fetch_url(&self, id: &PaperId) -> String {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("id", id.to_string()),
            ("retmode", "xml".to_string()),
        ];
        params.extend(self.etiquette_params());

        format!(
            "{}/efetch.fcgi?{}",
            self.base_url,
            Self::encode_params(&params)
        )
    }

    /// Parse E-utilities search response JSON
    ///
    /// A body without `esearchresult.idlist` yields no identifiers.
    fn parse_search_response(body: &str) -> Result<Vec<PaperId>, SourceError> {
        #[derive(Debug, Deserialize)]
        struct ESearchResponse {
            #[serde(default)]
            esearchresult: Option<ESearchResult>,
        }

        #[derive(Debug, Deserialize)]
        struct ESearchResult {
            #[serde(default)]
            idlist: Vec<String>,
            #[serde(rename = "ERROR", default)]
            error: Option<String>,
        }

        let response: ESearchResponse = serde_json::from_str(body).map_err(|e| {
            SourceError::Parse(format!("Failed to parse PubMed search JSON: {}", e))
        })?;

        let Some(result) = response.esearchresult else {
            return Ok(Vec::new());
        };

        if let Some(error) = &result.error {
            tracing::warn!("PubMed esearch reported an error: {}", error);
        }

        Ok(result.idlist.into_iter().map(PaperId::from).collect())
    }

    /// GET `url` and return the body, retrying per the configured policy
    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let client = Arc::clone(&self.client);

        with_retry(self.retry, || {
            let client = Arc::clone(&client);
            let url = url.to_string();
            async move {
                let response = client.get(&url).send().await.map_err(|e| {
                    SourceError::Network(format!("Failed to reach PubMed: {}", e))
                })?;

                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(SourceError::RateLimit);
                }
                if !status.is_success() {
                    return Err(SourceError::Api {
                        source_name: "PubMed".to_string(),
                        status: status.as_u16(),
                    });
                }

                response
                    .text()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))
            }
        })
        .await
    }
}

#[async_trait]
impl Source for PubMedSource {
    fn name(&self) -> &str {
        "PubMed"
    }

    async fn search(&self, query: &str) -> Result<Vec<PaperId>, SourceError> {
        if query.trim().is_empty() {
            return Err(SourceError::InvalidRequest(
                "search query must not be empty".to_string(),
            ));
        }

        let url = self.build_search_url(query);
        tracing::debug!(%url, "PubMed esearch");

        let body = self.get_text(&url).await?;
        let ids = Self::parse_search_response(&body)?;

        tracing::debug!(count = ids.len(), "PubMed esearch returned identifiers");
        Ok(ids)
    }

    async fn fetch(&self, id: &PaperId) -> Result<RawRecord, SourceError> {
        let url = self.build_fetch_url(id);
        tracing::debug!(%url, "PubMed efetch");

        let body = self.get_text(&url).await?;
        Ok(RawRecord::from(body))
    }
}
