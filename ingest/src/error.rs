use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("entry is malformed: {0}")]
    MalformedEntry(String),

    #[error("unrecognized priority token {token:?} on entry {ent_seq}")]
    UnknownPriority { ent_seq: i64, token: String },

    #[error("failed to parse XML document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("failed to parse JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Store(#[from] kotoba_core::error::StoreError),

    #[error("could not read input file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
