//! # PubMed Fetcher
//!
//! Searches PubMed and reports, for each paper found, the authors whose
//! affiliation looks like a pharmaceutical or biotech company, together with
//! the first email address in the record.
//!
//! ## Architecture
//!
//! - [`sources`]: literature index access (PubMed E-utilities, mock source)
//! - [`extract`]: author/affiliation scraping and commercial classification
//! - [`models`]: identifiers, records, findings and output rows
//! - [`pipeline`]: search → fetch → extract → aggregate
//! - [`output`]: CSV file and console rendering
//! - [`utils`]: HTTP client and retry helpers
//! - [`config`]: configuration management

pub mod config;
pub mod extract;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use extract::{extract, AuthorExtractor, CommercialClassifier, MarkerExtractor};
pub use models::{AffiliationFinding, PaperId, PaperRow, RawRecord};
pub use pipeline::{Pipeline, PipelineError};
pub use sources::{MockSource, PubMedSource, Source, SourceError};
