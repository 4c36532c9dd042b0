//! Paper identifiers, raw records and the output row built for each paper.

use serde::{Deserialize, Serialize};

use super::AffiliationFinding;

/// Placeholder for a name or affiliation that could not be extracted.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for an output column with no value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Opaque identifier of one record in the literature index (a PMID for PubMed).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperId(String);

impl PaperId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PaperId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PaperId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PaperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unparsed full-record text for one paper, exactly as the index returned it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord(String);

impl RawRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for RawRecord {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for RawRecord {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// One output row per paper.
///
/// Field renames are the column headers of the CSV file, so serializing a
/// slice of rows with a `csv::Writer` produces the header row for free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRow {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Publication Date")]
    pub publication_date: String,

    /// Authors with a commercial affiliation, comma-joined
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,

    /// Affiliations parallel to `non_academic_authors`, comma-joined
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,

    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

impl PaperRow {
    /// CSV column headers, in output order.
    pub const HEADERS: [&'static str; 6] = [
        "PubmedID",
        "Title",
        "Publication Date",
        "Non-academic Author(s)",
        "Company Affiliation(s)",
        "Corresponding Author Email",
    ];

    /// Build the row for `id` from its extraction result.
    ///
    /// Title and publication date are not extracted and always hold `N/A`.
    /// An empty author list stays an empty string; only the email column
    /// falls back to `N/A`.
    pub fn from_finding(id: &PaperId, finding: &AffiliationFinding) -> Self {
        Self {
            pubmed_id: id.to_string(),
            title: NOT_AVAILABLE.to_string(),
            publication_date: NOT_AVAILABLE.to_string(),
            non_academic_authors: finding.authors.join(", "),
            company_affiliations: finding.companies.join(", "),
            corresponding_email: finding
                .email
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }

    /// Column values in header order.
    pub fn fields(&self) -> [&str; 6] {
        [
            self.pubmed_id.as_str(),
            self.title.as_str(),
            self.publication_date.as_str(),
            self.non_academic_authors.as_str(),
            self.company_affiliations.as_str(),
            self.corresponding_email.as_str(),
        ]
    }
}

/// Combine an identifier and its finding into an output row.
pub fn aggregate(id: &PaperId, finding: &AffiliationFinding) -> PaperRow {
    PaperRow::from_finding(id, finding)
}
