use thiserror::Error;

/// Error taxonomy for the retrieval core.
///
/// `NotFound` is kept distinct so callers can tell "nothing built yet"
/// (missing manifest, partition, or index artifact) apart from a generic
/// failure. Collaborator errors (`Encoder`, `Metadata`) are propagated
/// as-is; nothing in this core retries.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("unsupported modality: {0}")]
    Unsupported(String),

    #[error("artifact missing: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("query encoder failed: {0}")]
    Encoder(#[source] anyhow::Error),

    #[error("metadata lookup failed: {0}")]
    Metadata(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
