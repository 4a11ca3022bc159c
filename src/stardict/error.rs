//! Custom error types for the stardict-importer crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Only fatal conditions surface here. Per-entry problems (out-of-bounds
/// spans, empty or oversized content, duplicates) become skip outcomes in
/// the [`ImportSummary`](super::models::ImportSummary) counters instead.
#[derive(Debug, Error)]
pub enum ImportError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// One of the three archive files could not be located.
    #[error("archive file not found: {0}")]
    FileNotFound(PathBuf),

    /// The archive is structurally invalid (bad header signature,
    /// undecodable index word, empty entry list).
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A required `.ifo` header key is absent.
    #[error("missing required field in .ifo header: {0}")]
    MissingField(&'static str),

    /// A numeric `.ifo` header field failed integer coercion.
    #[error("malformed value for .ifo field {field}: {value:?}")]
    MalformedValue { field: &'static str, value: String },

    /// A gzip-compressed archive file could not be decompressed.
    #[error("corrupt archive file {path}: {reason}")]
    CorruptArchive { path: PathBuf, reason: String },

    /// A definition span points outside the decompressed blob.
    ///
    /// Raised only by [`BlobStore::slice`](super::blob::BlobStore::slice);
    /// the extractor converts it into a per-entry skip.
    #[error("definition span out of bounds: offset {offset} + length {length} > blob size {blob_len}")]
    OutOfBounds {
        offset: u32,
        length: u32,
        blob_len: usize,
    },

    /// The run was cancelled by the caller between stages or chunks.
    #[error("import cancelled")]
    Cancelled,
}

/// A convenience `Result` type alias using the crate's `ImportError` type.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Error reported by the glossary store collaborators.
///
/// The store owns its failure detail (connection loss, constraint
/// violation, transaction rollback); this crate only needs a message to
/// log and count against the affected chunk.
#[derive(Debug, Error)]
#[error("glossary store error: {0}")]
pub struct PersistenceError(pub String);

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
