//! Result of classifying the authors of one record.

use serde::{Deserialize, Serialize};

use super::UNKNOWN;

/// An author name paired with the affiliation found in the same author block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorAffiliation {
    pub name: String,
    pub affiliation: String,
}

impl AuthorAffiliation {
    pub fn new(name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: affiliation.into(),
        }
    }

    /// Build from optionally extracted parts, substituting `Unknown` for
    /// anything missing or blank.
    pub fn from_parts(name: Option<&str>, affiliation: Option<&str>) -> Self {
        fn or_unknown(value: Option<&str>) -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v.to_string(),
                _ => UNKNOWN.to_string(),
            }
        }

        Self {
            name: or_unknown(name),
            affiliation: or_unknown(affiliation),
        }
    }
}

/// Authors judged to have a commercial affiliation, plus the first email
/// address seen anywhere in the record.
///
/// `authors[i]` and `companies[i]` always describe the same author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationFinding {
    pub authors: Vec<String>,
    pub companies: Vec<String>,
    pub email: Option<String>,
}

impl AffiliationFinding {
    /// Record a commercially affiliated author.
    pub fn push(&mut self, author: AuthorAffiliation) {
        self.authors.push(author.name);
        self.companies.push(author.affiliation);
    }

    /// Number of commercially affiliated authors.
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    /// True when no author matched and no email was found.
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_defaults_to_unknown() {
        let author = AuthorAffiliation::from_parts(None, Some("  "));
        assert_eq!(author.name, "Unknown");
        assert_eq!(author.affiliation, "Unknown");
    }

    #[test]
    fn test_push_keeps_lists_parallel() {
        let mut finding = AffiliationFinding::default();
        finding.push(AuthorAffiliation::new("Doe", "Acme Inc"));
        finding.push(AuthorAffiliation::new("Roe", "Beta GmbH"));

        assert_eq!(finding.len(), 2);
        assert_eq!(finding.authors, vec!["Doe", "Roe"]);
        assert_eq!(finding.companies, vec!["Acme Inc", "Beta GmbH"]);
        assert!(!finding.is_empty());
    }
}
