//! Hybrid search orchestration: encode, vector top-k with over-fetch,
//! metadata join/filter, then pagination.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use matsearch_core::traits::{MetadataStore, QueryEncoder};
use matsearch_core::types::{Modality, SearchHit, SearchRequest, SearchResponse};
use matsearch_core::{Error, Result};

use crate::cache::BackendCache;

pub struct HybridSearchEngine {
    index_root: PathBuf,
    encoders: HashMap<Modality, Arc<dyn QueryEncoder>>,
    metadata: Arc<dyn MetadataStore>,
    cache: BackendCache,
}

impl HybridSearchEngine {
    pub fn new(index_root: impl Into<PathBuf>, metadata: Arc<dyn MetadataStore>) -> Self {
        Self {
            index_root: index_root.into(),
            encoders: HashMap::new(),
            metadata,
            cache: BackendCache::new(),
        }
    }

    /// Register the encoder for one modality. A modality without an encoder
    /// resolves to `Error::Unsupported` at query time.
    pub fn with_encoder(mut self, kind: Modality, encoder: Arc<dyn QueryEncoder>) -> Self {
        self.encoders.insert(kind, encoder);
        self
    }

    pub fn search(&self, req: &SearchRequest) -> Result<SearchResponse> {
        let started = Instant::now();

        if req.top_k == 0 || req.page == 0 || req.size == 0 {
            return Err(Error::InvalidArgument(
                "top_k, page and size must be positive".to_string(),
            ));
        }

        let encoder = self.encoders.get(&req.kind).ok_or_else(|| {
            Error::Unsupported(format!("no query encoder registered for '{}'", req.kind))
        })?;
        let (model, query_vec) = encoder
            .encode(&req.query, req.model.as_deref())
            .map_err(Error::Encoder)?;

        let backend = self.cache.get_or_open(&self.index_root, req.kind, &model)?;

        // Filtering and pagination happen after retrieval, so pull enough
        // candidates to fill the requested page. A filter that rejects more
        // than the over-fetch margin can still leave the page short; that
        // is the documented contract, not something to paper over here.
        let fetch = req.top_k.max(req.page * req.size);
        let (indices, scores) = backend.search(&query_vec, fetch)?;

        let candidates: Vec<(String, f32)> = indices
            .iter()
            .zip(&scores)
            .filter(|(&i, _)| i >= 0)
            .map(|(&i, &s)| (backend.ids()[i as usize].clone(), s))
            .collect();

        let meta = if candidates.is_empty() {
            HashMap::new()
        } else {
            let doc_ids: Vec<String> = candidates.iter().map(|(id, _)| id.clone()).collect();
            self.metadata
                .fetch(&doc_ids, req.filters.as_ref())
                .map_err(Error::Metadata)?
        };

        // Join in score order; ids the metadata store did not return are
        // dropped, never zero-filled.
        let kept: Vec<SearchHit> = candidates
            .into_iter()
            .filter_map(|(doc_id, score)| {
                meta.get(&doc_id).map(|m| SearchHit {
                    doc_id,
                    score,
                    title: m.title.clone(),
                    year: m.year,
                    source: m.source.clone(),
                    kind: m.kind.clone(),
                    method: m.method.clone(),
                })
            })
            .collect();

        // "total" counts matches within the fetched candidate window, not
        // corpus-wide matches.
        let total = kept.len();
        let start = (req.page - 1) * req.size;
        let items: Vec<SearchHit> =
            kept.into_iter().skip(start).take(req.size).collect();

        tracing::info!(
            kind = %req.kind,
            model,
            top_k = req.top_k,
            page = req.page,
            size = req.size,
            fetched = fetch,
            results = items.len(),
            total_after_filters = total,
            latency_ms = started.elapsed().as_millis() as u64,
            "search done"
        );

        Ok(SearchResponse { total, page: req.page, size: req.size, items })
    }
}
