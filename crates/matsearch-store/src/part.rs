//! Partition codecs. Two interchangeable encodings per part, selected by
//! file extension:
//!
//! - `.arrow`: Arrow IPC file with a `doc_id` (Utf8) column and a `vector`
//!   (FixedSizeList<Float32, dim>) column
//! - `.vecs`: bincode bundle of the id array and the packed float matrix

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use arrow_array::cast::AsArray;
use arrow_array::types::Float32Type;
use arrow_array::{FixedSizeListArray, RecordBatch, StringArray};
use arrow_ipc::reader::FileReader;
use arrow_ipc::writer::FileWriter;
use arrow_schema::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};

use matsearch_core::types::VectorMatrix;
use matsearch_core::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartFormat {
    Arrow,
    Packed,
}

impl PartFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PartFormat::Arrow => "arrow",
            PartFormat::Packed => "vecs",
        }
    }
}

fn codec_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Codec(e.to_string())
}

fn part_schema(dim: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("doc_id", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                dim as i32,
            ),
            true,
        ),
    ]))
}

pub fn write_part(
    path: &Path,
    format: PartFormat,
    ids: &[String],
    vectors: &VectorMatrix,
) -> Result<()> {
    match format {
        PartFormat::Arrow => write_arrow(path, ids, vectors),
        PartFormat::Packed => write_packed(path, ids, vectors),
    }
}

/// Read one partition file, dispatching on its extension.
pub fn read_part(path: &Path) -> Result<(Vec<String>, VectorMatrix)> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("arrow") => read_arrow(path),
        Some("vecs") => read_packed(path),
        _ => Err(Error::InvalidArgument(format!(
            "unsupported part format: {}",
            path.display()
        ))),
    }
}

fn write_arrow(path: &Path, ids: &[String], vectors: &VectorMatrix) -> Result<()> {
    let schema = part_schema(vectors.dim());
    let rows: Vec<Option<Vec<Option<f32>>>> = vectors
        .iter_rows()
        .map(|r| Some(r.iter().copied().map(Some).collect()))
        .collect();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(ids.to_vec())),
            Arc::new(FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
                rows.into_iter(),
                vectors.dim() as i32,
            )),
        ],
    )
    .map_err(codec_err)?;

    let file = File::create(path)?;
    let mut writer = FileWriter::try_new(file, &schema).map_err(codec_err)?;
    writer.write(&batch).map_err(codec_err)?;
    writer.finish().map_err(codec_err)?;
    Ok(())
}

fn read_arrow(path: &Path) -> Result<(Vec<String>, VectorMatrix)> {
    let file = File::open(path)?;
    let reader = FileReader::try_new(BufReader::new(file), None).map_err(codec_err)?;

    let dim = match reader.schema().field_with_name("vector").map_err(codec_err)?.data_type() {
        DataType::FixedSizeList(_, n) => *n as usize,
        other => {
            return Err(Error::Codec(format!(
                "vector column has unexpected type {other} in {}",
                path.display()
            )))
        }
    };

    let mut ids = Vec::new();
    let mut vectors = VectorMatrix::empty(dim);
    for batch in reader {
        let batch = batch.map_err(codec_err)?;
        let id_col = batch
            .column_by_name("doc_id")
            .and_then(|c| c.as_any().downcast_ref::<StringArray>())
            .ok_or_else(|| Error::Codec(format!("doc_id column missing in {}", path.display())))?;
        let vec_col = batch
            .column_by_name("vector")
            .and_then(|c| c.as_any().downcast_ref::<FixedSizeListArray>())
            .ok_or_else(|| Error::Codec(format!("vector column missing in {}", path.display())))?;
        for i in 0..batch.num_rows() {
            ids.push(id_col.value(i).to_string());
            let row = vec_col.value(i);
            let vals = row.as_primitive::<Float32Type>();
            vectors.push_row(vals.values())?;
        }
    }
    Ok((ids, vectors))
}

#[derive(Serialize, Deserialize)]
struct PackedPart {
    ids: Vec<String>,
    vectors: VectorMatrix,
}

fn write_packed(path: &Path, ids: &[String], vectors: &VectorMatrix) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let part = PackedPart { ids: ids.to_vec(), vectors: vectors.clone() };
    bincode::serialize_into(writer, &part).map_err(codec_err)?;
    Ok(())
}

fn read_packed(path: &Path) -> Result<(Vec<String>, VectorMatrix)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let part: PackedPart = bincode::deserialize_from(reader).map_err(codec_err)?;
    Ok((part.ids, part.vectors))
}
