//! Author affiliation extraction.
//!
//! Turns one raw PubMed record into an [`AffiliationFinding`]: the authors
//! whose affiliation looks commercial, plus the first email address seen in
//! the record.
//!
//! Extraction is split in two so the text scraping can be replaced without
//! touching the pipeline:
//!
//! - an [`AuthorExtractor`] pulls `(name, affiliation)` pairs and an email
//!   out of the record ([`MarkerExtractor`] does this with tag markers)
//! - a [`CommercialClassifier`] decides which affiliations are commercial
//!
//! Extraction never fails. Missing structure degrades to `Unknown`
//! placeholders or to an empty finding.

mod classifier;
mod markers;

pub use classifier::{CommercialClassifier, COMPANY_KEYWORDS};
pub use markers::{MarkerExtractor, MarkerTags};

use std::sync::OnceLock;

use crate::models::{AffiliationFinding, AuthorAffiliation, RawRecord};

/// Pulls authors and a contact email out of a raw record.
pub trait AuthorExtractor: Send + Sync + std::fmt::Debug {
    /// Every author in document order, with `Unknown` for missing parts
    fn extract_authors(&self, record: &RawRecord) -> Vec<AuthorAffiliation>;

    /// First email address anywhere in the record
    fn extract_email(&self, record: &RawRecord) -> Option<String>;
}

static DEFAULT_EXTRACTOR: OnceLock<Result<MarkerExtractor, regex::Error>> = OnceLock::new();

/// Shared PubMed marker extractor, compiled on first use.
pub fn default_extractor() -> Result<&'static MarkerExtractor, regex::Error> {
    DEFAULT_EXTRACTOR
        .get_or_init(MarkerExtractor::pubmed)
        .as_ref()
        .map_err(Clone::clone)
}

/// Classify a record with the PubMed markers and the standard keyword list.
///
/// If the marker patterns cannot be compiled the finding is empty.
pub fn extract(record: &RawRecord) -> AffiliationFinding {
    match default_extractor() {
        Ok(extractor) => extract_with(extractor, &CommercialClassifier::default(), record),
        Err(err) => {
            tracing::error!(%err, "marker patterns failed to compile");
            AffiliationFinding::default()
        }
    }
}

/// Classify a record with a custom extractor and classifier.
pub fn extract_with(
    extractor: &dyn AuthorExtractor,
    classifier: &CommercialClassifier,
    record: &RawRecord,
) -> AffiliationFinding {
    let mut finding = AffiliationFinding::default();

    for author in extractor.extract_authors(record) {
        if classifier.is_commercial(&author.affiliation) {
            tracing::trace!(name = %author.name, affiliation = %author.affiliation, "commercial affiliation");
            finding.push(author);
        }
    }

    finding.email = extractor.extract_email(record);
    finding
}
