//! Core data models for papers, extraction findings and output rows.

mod finding;
mod paper;

pub use finding::{AffiliationFinding, AuthorAffiliation};
pub use paper::{aggregate, PaperId, PaperRow, RawRecord, NOT_AVAILABLE, UNKNOWN};
