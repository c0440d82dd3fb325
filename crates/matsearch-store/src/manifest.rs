//! Per-(kind, model) manifest: an append-only list of partition descriptors.
//!
//! The manifest is the source of truth for which parts exist and in which
//! order they were built; the loader replays it verbatim, so descriptor
//! order determines row order in the concatenated matrix.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use matsearch_core::{Error, Result};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartEntry {
    pub part: String,
    pub count: usize,
    pub dim: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    pub kind: String,
    pub model: String,
    pub parts: Vec<PartEntry>,
}

impl Manifest {
    pub fn new(kind: &str, model: &str) -> Self {
        Self { kind: kind.to_string(), model: model.to_string(), parts: Vec::new() }
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Err(Error::NotFound(format!("manifest not found: {}", path.display())));
        }
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Dimension shared by all descriptors, if any exist.
    pub fn dim(&self) -> Option<usize> {
        self.parts.first().map(|p| p.dim)
    }

    /// Append one descriptor and write the manifest back atomically
    /// (write to a temp file in the same directory, then rename).
    ///
    /// All descriptors must share one dimension; appending a mismatched
    /// dim is a shape error. Duplicate part names are not detected here:
    /// picking unique names is the caller's responsibility.
    pub fn append(dir: &Path, kind: &str, model: &str, entry: PartEntry) -> Result<Self> {
        let mut manifest = match Self::load(dir) {
            Ok(m) => m,
            Err(Error::NotFound(_)) => Self::new(kind, model),
            Err(e) => return Err(e),
        };
        if let Some(dim) = manifest.dim() {
            if dim != entry.dim {
                return Err(Error::Shape(format!(
                    "part '{}' has dim {}, manifest dim is {}",
                    entry.part, entry.dim, dim
                )));
            }
        }
        manifest.parts.push(entry);

        let path = Self::path_in(dir);
        let tmp = dir.join(format!("{MANIFEST_FILE}.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(&manifest)?)?;
        fs::rename(&tmp, &path)?;
        Ok(manifest)
    }
}
