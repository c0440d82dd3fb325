//! Collaborator seams: query encoding and relational metadata lookup are
//! external to the retrieval core and plug in through these traits.

use std::collections::HashMap;

use crate::types::{DocMeta, SearchFilters};

/// Turns free text into a query vector.
///
/// `encode` resolves the optional model override to the concrete model
/// identifier it actually used; that resolved name keys the backend cache.
pub trait QueryEncoder: Send + Sync {
    fn encode(&self, query: &str, model: Option<&str>) -> anyhow::Result<(String, Vec<f32>)>;
}

/// Read-only, parameterized lookup against the relational metadata store.
///
/// Returns one record per id that exists and passes the filters; absent
/// ids are simply omitted from the map. Must tolerate large id batches,
/// since the engine fetches the whole candidate window in one call.
pub trait MetadataStore: Send + Sync {
    fn fetch(
        &self,
        doc_ids: &[String],
        filters: Option<&SearchFilters>,
    ) -> anyhow::Result<HashMap<String, DocMeta>>;
}
