use tempfile::TempDir;

use matsearch_core::types::{Modality, VectorMatrix};
use matsearch_core::Error;
use matsearch_store::{load_parts, EmbeddingStore, Manifest, PartFormat};

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn round_trip_arrow_part() {
    let tmp = TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path());
    let vecs = VectorMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();

    let out = store
        .save_part(Modality::Text, "m1", "part-000", &ids(&["u1", "u2"]), &vecs, PartFormat::Arrow)
        .unwrap();
    assert!(out.exists());
    assert_eq!(out.extension().unwrap(), "arrow");

    let (got_ids, got_vecs) = load_parts(tmp.path(), Modality::Text, "m1").unwrap();
    assert_eq!(got_ids, ids(&["u1", "u2"]));
    assert_eq!(got_vecs, vecs);
}

#[test]
fn round_trip_packed_part() {
    let tmp = TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path());
    let vecs = VectorMatrix::from_rows(&[vec![0.5, -0.5], vec![1.5, 2.5], vec![0.0, 0.0]]).unwrap();

    let out = store
        .save_part(
            Modality::Timeseries,
            "fft-v1",
            "p0",
            &ids(&["a", "b", "c"]),
            &vecs,
            PartFormat::Packed,
        )
        .unwrap();
    assert_eq!(out.extension().unwrap(), "vecs");

    let (got_ids, got_vecs) = load_parts(tmp.path(), Modality::Timeseries, "fft-v1").unwrap();
    assert_eq!(got_ids, ids(&["a", "b", "c"]));
    assert_eq!(got_vecs, vecs);
}

#[test]
fn manifest_appends_in_save_order() {
    let tmp = TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path());
    let a = VectorMatrix::from_rows(&[vec![1.0; 5], vec![2.0; 5], vec![3.0; 5]]).unwrap();
    let b = VectorMatrix::from_rows(&[vec![4.0; 5]]).unwrap();

    store
        .save_part(Modality::Text, "mini", "part-000", &ids(&["u1", "u2", "u3"]), &a, PartFormat::Packed)
        .unwrap();
    store
        .save_part(Modality::Text, "mini", "part-001", &ids(&["u4"]), &b, PartFormat::Packed)
        .unwrap();

    let dir = tmp.path().join("text").join("mini");
    let manifest = Manifest::load(&dir).unwrap();
    assert_eq!(manifest.kind, "text");
    assert_eq!(manifest.model, "mini");
    assert_eq!(manifest.parts.len(), 2);
    assert_eq!(manifest.parts[0].part, "part-000");
    assert_eq!(manifest.parts[0].count, 3);
    assert_eq!(manifest.parts[0].dim, 5);
    assert_eq!(manifest.parts[1].part, "part-001");
    assert_eq!(manifest.parts[1].count, 1);
}

#[test]
fn save_rejects_id_row_mismatch() {
    let tmp = TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path());
    let vecs = VectorMatrix::from_rows(&[vec![1.0, 2.0]]).unwrap();

    let err = store
        .save_part(Modality::Text, "m", "p", &ids(&["a", "b"]), &vecs, PartFormat::Packed)
        .unwrap_err();
    assert!(matches!(err, Error::Shape(_)));
}

#[test]
fn manifest_rejects_dim_change() {
    let tmp = TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path());
    let a = VectorMatrix::from_rows(&[vec![1.0, 2.0]]).unwrap();
    let b = VectorMatrix::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();

    store
        .save_part(Modality::Text, "m", "p0", &ids(&["a"]), &a, PartFormat::Packed)
        .unwrap();
    let err = store
        .save_part(Modality::Text, "m", "p1", &ids(&["b"]), &b, PartFormat::Packed)
        .unwrap_err();
    assert!(matches!(err, Error::Shape(_)));
}

#[test]
fn zero_row_part_round_trips() {
    let tmp = TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path());
    let empty = VectorMatrix::empty(4);

    store
        .save_part(Modality::Simulation, "hist-v2", "p0", &[], &empty, PartFormat::Arrow)
        .unwrap();

    let dir = tmp.path().join("simulation").join("hist-v2");
    let manifest = Manifest::load(&dir).unwrap();
    assert_eq!(manifest.parts[0].count, 0);
    assert_eq!(manifest.parts[0].dim, 4);

    let (got_ids, got_vecs) = load_parts(tmp.path(), Modality::Simulation, "hist-v2").unwrap();
    assert!(got_ids.is_empty());
    assert_eq!(got_vecs.rows(), 0);
    assert_eq!(got_vecs.dim(), 4);
}

#[test]
fn load_missing_manifest_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = load_parts(tmp.path(), Modality::Text, "nope").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn load_missing_part_file_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path());
    let vecs = VectorMatrix::from_rows(&[vec![1.0]]).unwrap();
    let out = store
        .save_part(Modality::Text, "m", "p0", &ids(&["a"]), &vecs, PartFormat::Packed)
        .unwrap();
    std::fs::remove_file(out).unwrap();

    let err = load_parts(tmp.path(), Modality::Text, "m").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn loader_concatenates_parts_in_manifest_order() {
    let tmp = TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path());
    let a = VectorMatrix::from_rows(&[vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]]).unwrap();
    let b = VectorMatrix::from_rows(&[vec![0.0, 0.0, 1.0, 0.0]]).unwrap();

    // Mixed encodings on purpose; the loader must not care.
    store
        .save_part(Modality::Text, "m1", "a", &ids(&["d1", "d2"]), &a, PartFormat::Arrow)
        .unwrap();
    store
        .save_part(Modality::Text, "m1", "b", &ids(&["d3"]), &b, PartFormat::Packed)
        .unwrap();

    let (got_ids, got_vecs) = load_parts(tmp.path(), Modality::Text, "m1").unwrap();
    assert_eq!(got_ids, ids(&["d1", "d2", "d3"]));
    assert_eq!(got_vecs.rows(), 3);
    assert_eq!(got_vecs.dim(), 4);
    assert_eq!(got_vecs.row(0), &[1.0, 0.0, 0.0, 0.0]);
    assert_eq!(got_vecs.row(2), &[0.0, 0.0, 1.0, 0.0]);
}
