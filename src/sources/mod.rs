//! Literature index sources.
//!
//! A [`Source`] provides the two capabilities the extraction pipeline needs
//! from an external index: turning a query into an ordered list of paper
//! identifiers, and turning one identifier into its raw full record.
//!
//! - [`PubMedSource`]: NCBI E-utilities (`esearch` + `efetch`)
//! - [`MockSource`]: canned identifiers and records for tests

mod mock;
mod pubmed;

pub use mock::MockSource;
pub use pubmed::{PubMedSource, PUBMED_EUTILS_BASE_URL};

use crate::models::{PaperId, RawRecord};
use async_trait::async_trait;

/// Interface to a literature index.
///
/// Implementations must return identifiers in the index's own order and must
/// surface transport failures as errors rather than empty results.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Search the index, returning at most the configured page size of identifiers
    async fn search(&self, query: &str) -> Result<Vec<PaperId>, SourceError>;

    /// Retrieve the full record for one identifier
    async fn fetch(&self, id: &PaperId) -> Result<RawRecord, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the index
    #[error("API error: {source_name} returned status {status}")]
    Api { source_name: String, status: u16 },

    /// Parsing error (malformed response body)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl SourceError {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Network(_) | SourceError::RateLimit => true,
            SourceError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
