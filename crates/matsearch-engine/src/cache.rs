//! Backend cache keyed by (kind, model).
//!
//! Entries live for the lifetime of the process; there is no eviction.
//! First access for a key is guarded by a per-key `OnceCell`, so concurrent
//! cold lookups perform at most one index load per key. A failed load
//! leaves the cell empty and the next caller retries.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;

use matsearch_core::types::Modality;
use matsearch_core::Result;
use matsearch_index::SearchBackend;

type Key = (Modality, String);
type Slot = Arc<OnceCell<Arc<SearchBackend>>>;

#[derive(Default)]
pub struct BackendCache {
    slots: Mutex<HashMap<Key, Slot>>,
}

impl BackendCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached backend for (kind, model), loading it from disk on
    /// first use.
    pub fn get_or_open(
        &self,
        index_root: &Path,
        kind: Modality,
        model: &str,
    ) -> Result<Arc<SearchBackend>> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots
                .entry((kind, model.to_string()))
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        slot.get_or_try_init(|| SearchBackend::open(index_root, kind, model).map(Arc::new))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matsearch_core::types::{Metric, VectorMatrix};
    use matsearch_core::Error;
    use matsearch_index::{save_index, FlatIndex};
    use tempfile::TempDir;

    #[test]
    fn cold_miss_on_missing_artifacts_is_retryable() {
        let tmp = TempDir::new().unwrap();
        let cache = BackendCache::new();

        let err = cache.get_or_open(tmp.path(), Modality::Text, "m").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        // Build the artifacts and the same key now loads.
        let vecs = VectorMatrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        let index = FlatIndex::build(vecs, Metric::InnerProduct);
        save_index(tmp.path(), Modality::Text, "m", &index, &["d1".to_string()]).unwrap();
        assert!(cache.get_or_open(tmp.path(), Modality::Text, "m").is_ok());
    }

    #[test]
    fn repeated_lookups_share_one_backend() {
        let tmp = TempDir::new().unwrap();
        let vecs = VectorMatrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        let index = FlatIndex::build(vecs, Metric::InnerProduct);
        save_index(tmp.path(), Modality::Text, "m", &index, &["d1".to_string()]).unwrap();

        let cache = BackendCache::new();
        let a = cache.get_or_open(tmp.path(), Modality::Text, "m").unwrap();
        let b = cache.get_or_open(tmp.path(), Modality::Text, "m").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
