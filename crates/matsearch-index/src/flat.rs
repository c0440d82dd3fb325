//! Exact flat similarity index.
//!
//! Build is a pure function of the input matrix and metric: the matrix is
//! stored verbatim and every query is a full scan, so identical inputs
//! answer identical top-k queries identically. Ties break toward the
//! lower row index (stable under the scan order).

use serde::{Deserialize, Serialize};

use matsearch_core::types::{Metric, VectorMatrix};
use matsearch_core::{Error, Result};

/// Sentinel row index returned when fewer than `top_k` rows exist.
/// Callers must filter these out before dereferencing the id mapping.
pub const NO_MATCH: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    metric: Metric,
    vectors: VectorMatrix,
}

impl FlatIndex {
    pub fn build(vectors: VectorMatrix, metric: Metric) -> Self {
        Self { metric, vectors }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn dim(&self) -> usize {
        self.vectors.dim()
    }

    pub fn len(&self) -> usize {
        self.vectors.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Top-k scan, best-first. Always returns exactly `top_k` entries,
    /// padding with `NO_MATCH` when the index holds fewer rows.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<(Vec<i64>, Vec<f32>)> {
        if !self.vectors.is_empty() && query.len() != self.vectors.dim() {
            return Err(Error::Shape(format!(
                "query has dim {}, index has dim {}",
                query.len(),
                self.vectors.dim()
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter_rows()
            .enumerate()
            .map(|(i, row)| (i, score(self.metric, query, row)))
            .collect();

        // Best-first: higher inner product, lower squared distance.
        match self.metric {
            Metric::InnerProduct => {
                scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
            }
            Metric::L2 => {
                scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
            }
        }
        scored.truncate(top_k);

        let pad = match self.metric {
            Metric::InnerProduct => f32::NEG_INFINITY,
            Metric::L2 => f32::INFINITY,
        };
        let mut indices: Vec<i64> = scored.iter().map(|(i, _)| *i as i64).collect();
        let mut scores: Vec<f32> = scored.iter().map(|(_, s)| *s).collect();
        indices.resize(top_k, NO_MATCH);
        scores.resize(top_k, pad);
        Ok((indices, scores))
    }
}

fn score(metric: Metric, query: &[f32], row: &[f32]) -> f32 {
    match metric {
        Metric::InnerProduct => query.iter().zip(row).map(|(q, v)| q * v).sum(),
        Metric::L2 => query.iter().zip(row).map(|(q, v)| (q - v) * (q - v)).sum(),
    }
}
