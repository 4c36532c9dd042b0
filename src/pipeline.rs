//! Search → fetch → extract → aggregate.
//!
//! One [`PaperRow`] is produced per identifier the search returns, in search
//! order. Any search or fetch failure aborts the run; no partial result set
//! is returned.

use futures_util::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;

use crate::config::Config;
use crate::extract::{default_extractor, extract_with, AuthorExtractor, CommercialClassifier};
use crate::models::{aggregate, PaperId, PaperRow};
use crate::sources::{Source, SourceError};

/// Errors that abort a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("search for {query:?} failed: {source}")]
    Search { query: String, source: SourceError },

    #[error("fetching record {id} failed: {source}")]
    Fetch { id: PaperId, source: SourceError },

    #[error("author markers could not be compiled: {0}")]
    Extractor(#[from] regex::Error),
}

/// Run-time knobs for [`Pipeline`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Records fetched at once; 1 fetches strictly one after another
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// The extraction pipeline over one [`Source`]
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: Arc<dyn Source>,
    /// `None` uses the shared PubMed marker extractor
    extractor: Option<Arc<dyn AuthorExtractor>>,
    classifier: CommercialClassifier,
    options: PipelineOptions,
}

impl Pipeline {
    /// Pipeline with the PubMed tag markers and the standard keyword list
    pub fn new(source: Arc<dyn Source>) -> Self {
        Self {
            source,
            extractor: None,
            classifier: CommercialClassifier::default(),
            options: PipelineOptions::default(),
        }
    }

    /// Pipeline configured from application settings
    pub fn from_config(source: Arc<dyn Source>, config: &Config) -> Self {
        Self::new(source).concurrency(config.pipeline.concurrency)
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn AuthorExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_classifier(mut self, classifier: CommercialClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.options.concurrency = concurrency.max(1);
        self
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Run the whole pipeline for one query
    pub async fn run(&self, query: &str) -> Result<Vec<PaperRow>, PipelineError> {
        let extractor: &dyn AuthorExtractor = match &self.extractor {
            Some(extractor) => extractor.as_ref(),
            None => default_extractor()?,
        };

        let ids = self
            .source
            .search(query)
            .await
            .map_err(|source| PipelineError::Search {
                query: query.to_string(),
                source,
            })?;

        tracing::info!(
            source = self.source.name(),
            query,
            count = ids.len(),
            "search complete"
        );

        let rows = if self.options.concurrency <= 1 {
            let mut rows = Vec::with_capacity(ids.len());
            for id in &ids {
                rows.push(self.process(extractor, id).await?);
            }
            rows
        } else {
            // `buffered` yields in input order, whatever order fetches finish in.
            stream::iter(ids.iter())
                .map(|id| self.process(extractor, id))
                .buffered(self.options.concurrency)
                .try_collect::<Vec<_>>()
                .await?
        };

        tracing::info!(rows = rows.len(), "pipeline complete");
        Ok(rows)
    }

    /// Fetch, extract and aggregate one identifier
    async fn process(
        &self,
        extractor: &dyn AuthorExtractor,
        id: &PaperId,
    ) -> Result<PaperRow, PipelineError> {
        let record = self
            .source
            .fetch(id)
            .await
            .map_err(|source| PipelineError::Fetch {
                id: id.clone(),
                source,
            })?;

        let finding = extract_with(extractor, &self.classifier, &record);
        tracing::debug!(
            %id,
            bytes = record.len(),
            commercial_authors = finding.len(),
            email = finding.email.is_some(),
            "record processed"
        );

        Ok(aggregate(id, &finding))
    }
}
