//! Tag-marker scraping of PubMed XML records.
//!
//! Blocks are found with non-greedy `<Tag ...>(.*?)</Tag>` patterns rather
//! than an XML parser, so truncated or unusual records still yield whatever
//! authors can be recognised.

use regex::Regex;

use super::AuthorExtractor;
use crate::models::{AuthorAffiliation, RawRecord};

/// Email shape: local part of `[a-zA-Z0-9._%+-]`, a domain of `[a-zA-Z0-9.-]`
/// and a dot-separated TLD of two or more ASCII letters.
///
/// Classes are spelled out in ASCII; `(?i)` would also fold in letters such
/// as `ſ` and the Kelvin sign.
const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// Tag names delimiting each level of the author structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerTags {
    pub author_list: String,
    pub author: String,
    pub name: String,
    pub affiliation: String,
}

impl Default for MarkerTags {
    fn default() -> Self {
        Self {
            author_list: "AuthorList".to_string(),
            author: "Author".to_string(),
            name: "LastName".to_string(),
            affiliation: "Affiliation".to_string(),
        }
    }
}

/// [`AuthorExtractor`] driven by start/end tag markers.
#[derive(Debug, Clone)]
pub struct MarkerExtractor {
    author_list: Regex,
    author: Regex,
    name: Regex,
    affiliation: Regex,
    email: Regex,
}

impl MarkerExtractor {
    /// Compile the marker patterns for `tags`.
    ///
    /// Tag names are escaped, so this only fails when a pattern exceeds the
    /// regex size limits.
    pub fn new(tags: &MarkerTags) -> Result<Self, regex::Error> {
        Ok(Self {
            author_list: block_pattern(&tags.author_list, true)?,
            author: block_pattern(&tags.author, true)?,
            name: block_pattern(&tags.name, false)?,
            affiliation: block_pattern(&tags.affiliation, false)?,
            email: Regex::new(EMAIL_PATTERN)?,
        })
    }

    /// Extractor for PubMed `efetch` XML.
    pub fn pubmed() -> Result<Self, regex::Error> {
        Self::new(&MarkerTags::default())
    }

    fn first_capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// `<tag>` or `<tag attr="...">` through the nearest `</tag>`.
///
/// Name and affiliation markers stay on one line; list and author blocks
/// span lines.
fn block_pattern(tag: &str, multiline: bool) -> Result<Regex, regex::Error> {
    let flags = if multiline { "(?s)" } else { "" };
    let tag = regex::escape(tag);
    Regex::new(&format!(r"{flags}<{tag}(?:\s[^>]*)?>(.*?)</{tag}>"))
}

impl AuthorExtractor for MarkerExtractor {
    fn extract_authors(&self, record: &RawRecord) -> Vec<AuthorAffiliation> {
        let text = record.as_str();
        let mut authors = Vec::new();

        for list in self.author_list.captures_iter(text) {
            let Some(list) = list.get(1) else { continue };

            for author in self.author.captures_iter(list.as_str()) {
                let Some(segment) = author.get(1) else { continue };
                let segment = segment.as_str();

                authors.push(AuthorAffiliation::from_parts(
                    Self::first_capture(&self.name, segment),
                    Self::first_capture(&self.affiliation, segment),
                ));
            }
        }

        tracing::trace!(count = authors.len(), "authors extracted");
        authors
    }

    fn extract_email(&self, record: &RawRecord) -> Option<String> {
        self.email
            .find(record.as_str())
            .map(|m| m.as_str().to_string())
    }
}
