//! # stardict-importer
//!
//! A parser and import pipeline for StarDict dictionary archives
//! (`.ifo`, `.idx`/`.idx.gz`, `.dict`/`.dict.gz` file triples).
//! Extracted entries are sanitized, classified by script (Devanagari,
//! IAST, romanized), deduplicated against an existing glossary corpus,
//! and persisted in fixed-size transactional batches.
//!
//! The surrounding web portal (HTTP, auth, search, ORM) is not part of
//! this crate; the target store is reached only through the
//! [`GlossaryLookup`] and [`GlossaryStore`] traits.
pub mod stardict;

// Re-export the main types for convenience
pub use stardict::{
    batch::{BatchImporter, GlossaryStore},
    blob::BlobStore,
    dedup::GlossaryLookup,
    error::{ImportError, PersistenceError, Result},
    importer::{
        CancelFlag, ImportOptions, ImportStage, NullObserver, ProgressObserver, ProgressUpdate,
        StardictImporter,
    },
    models::{
        ArchiveMetadata, ClassifiedRecord, Gender, GlossaryEntry, ImportSummary, IndexEntry,
        RawRecord, Script, SkipReason,
    },
};
