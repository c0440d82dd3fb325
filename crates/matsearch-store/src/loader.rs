//! Partition Loader: replays the manifest and concatenates every part for
//! a (kind, model) into one id array and one contiguous vector matrix.
//!
//! Row order is manifest order then within-part order; the index builder
//! relies on this ordering bit-for-bit for its id mapping.

use std::path::Path;

use matsearch_core::types::{Modality, VectorMatrix};
use matsearch_core::{Error, Result};

use crate::manifest::Manifest;
use crate::part::read_part;

pub fn load_parts(root: &Path, kind: Modality, model: &str) -> Result<(Vec<String>, VectorMatrix)> {
    let dir = root.join(kind.as_str()).join(model);
    let manifest = Manifest::load(&dir)?;

    let mut all_ids: Vec<String> = Vec::new();
    let mut all_vecs = VectorMatrix::empty(manifest.dim().unwrap_or(0));

    for entry in &manifest.parts {
        let arrow = dir.join(format!("{}.arrow", entry.part));
        let packed = dir.join(format!("{}.vecs", entry.part));
        let path = if arrow.exists() {
            arrow
        } else if packed.exists() {
            packed
        } else {
            return Err(Error::NotFound(format!(
                "part not found: {} or {}",
                arrow.display(),
                packed.display()
            )));
        };
        let (ids, vecs) = read_part(&path)?;
        all_ids.extend(ids);
        all_vecs.extend(&vecs)?;
    }

    tracing::debug!(
        kind = %kind,
        model,
        parts = manifest.parts.len(),
        rows = all_vecs.rows(),
        dim = all_vecs.dim(),
        "loaded embedding parts"
    );
    Ok((all_ids, all_vecs))
}
