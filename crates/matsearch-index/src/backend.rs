//! Search Backend: one loaded (index, id mapping) pair for a (kind, model).

use std::path::Path;

use matsearch_core::types::Modality;
use matsearch_core::Result;

use crate::flat::FlatIndex;
use crate::persist::load_index;

#[derive(Debug)]
pub struct SearchBackend {
    kind: Modality,
    model: String,
    index: FlatIndex,
    ids: Vec<String>,
}

impl SearchBackend {
    /// Load the persisted index and id mapping for (kind, model).
    /// A missing artifact propagates as `Error::NotFound`.
    pub fn open(index_root: &Path, kind: Modality, model: &str) -> Result<Self> {
        let (index, ids) = load_index(index_root, kind, model)?;
        tracing::info!(kind = %kind, model, rows = index.len(), "opened search backend");
        Ok(Self { kind, model: model.to_string(), index, ids })
    }

    pub fn kind(&self) -> Modality {
        self.kind
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Top-k rows and scores, best-first, sentinel-padded to `top_k`.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<(Vec<i64>, Vec<f32>)> {
        self.index.search(query, top_k)
    }

    /// Map row indices to document ids, dropping sentinel entries.
    pub fn resolve_ids(&self, indices: &[i64]) -> Vec<String> {
        indices
            .iter()
            .filter(|&&i| i >= 0)
            .map(|&i| self.ids[i as usize].clone())
            .collect()
    }
}
