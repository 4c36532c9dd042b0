//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{PaperId, RawRecord};
use crate::sources::{Source, SourceError};

/// A mock source that returns predefined identifiers and records.
#[derive(Debug, Default)]
pub struct MockSource {
    ids: Mutex<Vec<PaperId>>,
    records: Mutex<HashMap<PaperId, RawRecord>>,
    failing: Mutex<HashSet<PaperId>>,
    fail_search: Mutex<bool>,
    fetch_calls: AtomicUsize,
}

impl MockSource {
    /// Create an empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a paper; search results follow insertion order.
    pub fn with_record(self, id: &str, record: &str) -> Self {
        self.add_record(id, record);
        self
    }

    /// Add a paper in place.
    pub fn add_record(&self, id: &str, record: &str) {
        let id = PaperId::from(id);
        if let Ok(mut ids) = self.ids.lock() {
            ids.push(id.clone());
        }
        if let Ok(mut records) = self.records.lock() {
            records.insert(id, RawRecord::from(record));
        }
    }

    /// Make `fetch` fail for the given identifier.
    pub fn fail_fetch(&self, id: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(PaperId::from(id));
        }
    }

    /// Make `search` fail.
    pub fn fail_search(&self) {
        if let Ok(mut flag) = self.fail_search.lock() {
            *flag = true;
        }
    }

    /// Number of `fetch` calls made so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for MockSource {
    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, _query: &str) -> Result<Vec<PaperId>, SourceError> {
        if self.fail_search.lock().map(|f| *f).unwrap_or(false) {
            return Err(SourceError::Network("mock search failure".to_string()));
        }
        Ok(self.ids.lock().map(|ids| ids.clone()).unwrap_or_default())
    }

    async fn fetch(&self, id: &PaperId) -> Result<RawRecord, SourceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .failing
            .lock()
            .map(|f| f.contains(id))
            .unwrap_or(false);
        if failing {
            return Err(SourceError::Api {
                source_name: self.name().to_string(),
                status: 500,
            });
        }

        self.records
            .lock()
            .map_err(|_| SourceError::Other("mock source lock poisoned".to_string()))?
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::Other(format!("no canned record for {}", id)))
    }
}
