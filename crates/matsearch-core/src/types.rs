//! Domain types shared by the store, index, and engine crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Document families that may be embedded and indexed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Simulation,
    Timeseries,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Simulation => "simulation",
            Modality::Timeseries => "timeseries",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Modality::Text),
            "simulation" => Ok(Modality::Simulation),
            "timeseries" => Ok(Modality::Timeseries),
            other => Err(Error::InvalidArgument(format!(
                "kind must be text|simulation|timeseries, got '{other}'"
            ))),
        }
    }
}

/// Similarity metric for the flat index.
///
/// `InnerProduct` assumes pre-normalized vectors and therefore ranks like
/// cosine similarity; `L2` is squared Euclidean distance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[serde(rename = "ip")]
    InnerProduct,
    L2,
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ip" => Ok(Metric::InnerProduct),
            "l2" => Ok(Metric::L2),
            other => Err(Error::InvalidArgument(format!(
                "metric must be 'ip' or 'l2', got '{other}'"
            ))),
        }
    }
}

/// Dense row-major float32 matrix. Rank-2 by construction: every row has
/// exactly `dim` entries, so the `len(ids) == rows` and fixed-dimension
/// invariants reduce to length checks at the call sites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorMatrix {
    rows: usize,
    dim: usize,
    data: Vec<f32>,
}

impl VectorMatrix {
    /// An empty matrix with a known dimension (zero rows).
    pub fn empty(dim: usize) -> Self {
        Self { rows: 0, dim, data: Vec::new() }
    }

    /// Build from row slices, failing on ragged input.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let dim = rows.first().map_or(0, Vec::len);
        let mut m = Self::empty(dim);
        for r in rows {
            m.push_row(r)?;
        }
        Ok(m)
    }

    pub fn push_row(&mut self, row: &[f32]) -> Result<()> {
        if row.len() != self.dim {
            return Err(Error::Shape(format!(
                "row has {} values, matrix dim is {}",
                row.len(),
                self.dim
            )));
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    /// Append all rows of `other`, preserving their order.
    pub fn extend(&mut self, other: &VectorMatrix) -> Result<()> {
        if other.rows > 0 && other.dim != self.dim {
            return Err(Error::Shape(format!(
                "cannot concatenate dim {} onto dim {}",
                other.dim, self.dim
            )));
        }
        self.data.extend_from_slice(&other.data);
        self.rows += other.rows;
        Ok(())
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim.max(1)).take(self.rows)
    }
}

/// Optional metadata filters applied after the vector top-k stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub method: Option<String>,
}

fn default_top_k() -> usize {
    10
}

fn default_page() -> usize {
    1
}

fn default_size() -> usize {
    10
}

/// One modality per request; `query` is the free-text query for the
/// `text` modality. `page` is 1-indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub kind: Modality,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
}

/// A vector match joined with its relational metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub score: f32,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub source: Option<String>,
    pub kind: Option<String>,
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: usize,
    pub page: usize,
    pub size: usize,
    pub items: Vec<SearchHit>,
}

/// One metadata record as returned by the relational store collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    pub doc_id: String,
    pub kind: Option<String>,
    pub source: Option<String>,
    pub source_id: Option<String>,
    pub year: Option<i32>,
    pub method: Option<String>,
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_rejects_ragged_rows() {
        let err = VectorMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn matrix_concat_preserves_row_order() {
        let mut a = VectorMatrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let b = VectorMatrix::from_rows(&[vec![2.0, 2.0]]).unwrap();
        a.extend(&b).unwrap();
        assert_eq!(a.rows(), 3);
        assert_eq!(a.row(2), &[2.0, 2.0]);
    }

    #[test]
    fn matrix_concat_rejects_dim_mismatch() {
        let mut a = VectorMatrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        let b = VectorMatrix::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(matches!(a.extend(&b), Err(Error::Shape(_))));
    }

    #[test]
    fn empty_matrix_concat_is_a_noop() {
        let mut a = VectorMatrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        a.extend(&VectorMatrix::empty(0)).unwrap();
        assert_eq!(a.rows(), 1);
    }

    #[test]
    fn metric_and_modality_parse() {
        assert_eq!("ip".parse::<Metric>().unwrap(), Metric::InnerProduct);
        assert_eq!("l2".parse::<Metric>().unwrap(), Metric::L2);
        assert!("cosine".parse::<Metric>().is_err());
        assert_eq!("text".parse::<Modality>().unwrap(), Modality::Text);
        assert!("audio".parse::<Modality>().is_err());
    }

    #[test]
    fn request_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"kind":"text","query":"gan"}"#).unwrap();
        assert_eq!(req.top_k, 10);
        assert_eq!(req.page, 1);
        assert_eq!(req.size, 10);
        assert!(req.filters.is_none());
    }
}
