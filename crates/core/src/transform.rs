//! Memoized per-record transform
//!
//! The derived value of a record is computed at most once per record id and
//! kept for the lifetime of the cache. Records are immutable, so entries are
//! never invalidated or evicted; growth is bounded by the collection itself.
//!
//! Readers may race the first computation for an id. Each racer computes its
//! own value outside the lock, and the first one stored wins: every later read
//! returns that stored value.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::record::{Record, RecordId};

type TransformFn = dyn Fn(&Record) -> String + Send + Sync;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DerivedValue {
    pub for_record_id: RecordId,
    pub value: String,
}

/// The transform used when none is injected.
pub fn default_transform(record: &Record) -> String {
    format!("Computed: {}", record.title)
}

pub struct TransformCache {
    transform: Box<TransformFn>,
    entries: RwLock<HashMap<RecordId, Arc<DerivedValue>>>,
}

impl Default for TransformCache {
    fn default() -> Self {
        TransformCache::new(default_transform)
    }
}

impl fmt::Debug for TransformCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl TransformCache {
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&Record) -> String + Send + Sync + 'static,
    {
        TransformCache {
            transform: Box::new(transform),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the derived value for `record`, computing it on first use.
    pub fn get(&self, record: &Record) -> Arc<DerivedValue> {
        if let Some(found) = self.peek(record.id) {
            return found;
        }

        // Computed without holding the lock so slow transforms never block readers.
        let computed = Arc::new(DerivedValue {
            for_record_id: record.id,
            value: (self.transform)(record),
        });

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(record.id).or_insert(computed))
    }

    /// Look up a derived value without computing it.
    pub fn peek(&self, id: RecordId) -> Option<Arc<DerivedValue>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Derived values for `records`, in the same order.
    pub fn get_all(&self, records: &[Record]) -> Vec<Arc<DerivedValue>> {
        records.iter().map(|record| self.get(record)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
