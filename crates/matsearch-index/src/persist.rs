//! Index persistence: the index blob plus its id mapping, co-located under
//! `{root}/{kind}/{model}/`. Both files must be present to load; the id
//! mapping's position i answers "which document produced vector row i".

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use matsearch_core::types::{Metric, Modality};
use matsearch_core::{Error, Result};
use matsearch_store::load_parts;

use crate::flat::FlatIndex;

pub const INDEX_FILE: &str = "index.bin";
pub const IDS_FILE: &str = "ids.json";

fn codec_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Codec(e.to_string())
}

pub fn save_index(
    root: &Path,
    kind: Modality,
    model: &str,
    index: &FlatIndex,
    ids: &[String],
) -> Result<PathBuf> {
    if ids.len() != index.len() {
        return Err(Error::Shape(format!(
            "{} ids for an index of {} rows",
            ids.len(),
            index.len()
        )));
    }
    let dir = root.join(kind.as_str()).join(model);
    fs::create_dir_all(&dir)?;

    let index_path = dir.join(INDEX_FILE);
    let writer = BufWriter::new(File::create(&index_path)?);
    bincode::serialize_into(writer, index).map_err(codec_err)?;

    let ids_path = dir.join(IDS_FILE);
    fs::write(&ids_path, serde_json::to_vec(&ids)?)?;

    tracing::info!(
        kind = %kind,
        model,
        rows = index.len(),
        dim = index.dim(),
        path = %index_path.display(),
        "persisted flat index"
    );
    Ok(index_path)
}

pub fn load_index(root: &Path, kind: Modality, model: &str) -> Result<(FlatIndex, Vec<String>)> {
    let dir = root.join(kind.as_str()).join(model);
    let index_path = dir.join(INDEX_FILE);
    let ids_path = dir.join(IDS_FILE);
    if !index_path.exists() || !ids_path.exists() {
        return Err(Error::NotFound(format!(
            "missing index or ids in {}",
            dir.display()
        )));
    }

    let reader = BufReader::new(File::open(&index_path)?);
    let index: FlatIndex = bincode::deserialize_from(reader).map_err(codec_err)?;
    let ids: Vec<String> = serde_json::from_str(&fs::read_to_string(&ids_path)?)?;
    Ok((index, ids))
}

/// Load all partitions for a (kind, model), build a flat index, and persist
/// it with its id mapping. The only way a persisted, queryable index comes
/// into existence.
pub fn build_from_store(
    emb_root: &Path,
    index_root: &Path,
    kind: Modality,
    model: &str,
    metric: Metric,
) -> Result<PathBuf> {
    let (ids, vectors) = load_parts(emb_root, kind, model)?;
    let index = FlatIndex::build(vectors, metric);
    save_index(index_root, kind, model, &index, &ids)
}
