//! Keyword classification of affiliation strings.

/// Substrings that mark an affiliation as commercial.
///
/// Matching is a case-insensitive substring test with no word boundaries, so
/// "Incarnate Word" and "Lincoln" both match `inc`.
pub const COMPANY_KEYWORDS: [&str; 7] = ["pharma", "biotech", "inc", "ltd", "gmbh", "s.a.", "corp"];

/// Decides whether an affiliation string names a company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommercialClassifier {
    keywords: Vec<String>,
}

impl Default for CommercialClassifier {
    fn default() -> Self {
        Self::with_keywords(COMPANY_KEYWORDS)
    }
}

impl CommercialClassifier {
    /// Use a custom keyword list; keywords are lower-cased.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when the affiliation contains any keyword.
    pub fn is_commercial(&self, affiliation: &str) -> bool {
        let affiliation = affiliation.to_lowercase();
        self.keywords.iter().any(|k| affiliation.contains(k.as_str()))
    }

    /// Keywords found in the affiliation, in keyword-list order.
    pub fn matched_keywords(&self, affiliation: &str) -> Vec<&str> {
        let affiliation = affiliation.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| affiliation.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }
}
