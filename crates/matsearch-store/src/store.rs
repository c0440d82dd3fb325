//! Embedding Partition Store: persists (doc id, vector) batches under
//! `{root}/{kind}/{model}/{part}.{ext}` and appends one descriptor per
//! saved part to the manifest.

use std::fs;
use std::path::{Path, PathBuf};

use matsearch_core::types::{Modality, VectorMatrix};
use matsearch_core::{Error, Result};

use crate::manifest::{Manifest, PartEntry};
use crate::part::{write_part, PartFormat};

pub struct EmbeddingStore {
    root: PathBuf,
}

impl EmbeddingStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir(&self, kind: Modality, model: &str) -> Result<PathBuf> {
        let dir = self.root.join(kind.as_str()).join(model);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Persist one partition and append its descriptor to the manifest.
    ///
    /// Re-saving under an existing part name overwrites the partition file
    /// but still appends a fresh manifest entry; callers must pick unique
    /// part names to avoid duplicate bookkeeping.
    pub fn save_part(
        &self,
        kind: Modality,
        model: &str,
        part: &str,
        ids: &[String],
        vectors: &VectorMatrix,
        format: PartFormat,
    ) -> Result<PathBuf> {
        if ids.len() != vectors.rows() {
            return Err(Error::Shape(format!(
                "{} ids for {} vector rows",
                ids.len(),
                vectors.rows()
            )));
        }

        let dir = self.dir(kind, model)?;
        let out = dir.join(format!("{part}.{}", format.extension()));
        write_part(&out, format, ids, vectors)?;

        Manifest::append(
            &dir,
            kind.as_str(),
            model,
            PartEntry { part: part.to_string(), count: vectors.rows(), dim: vectors.dim() },
        )?;

        tracing::info!(
            kind = %kind,
            model,
            part,
            count = vectors.rows(),
            dim = vectors.dim(),
            "saved embedding part"
        );
        Ok(out)
    }
}
