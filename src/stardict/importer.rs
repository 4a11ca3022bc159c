//! The import pipeline: resolve, parse, extract, classify, deduplicate,
//! persist, report.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};

use super::archive::{self, ArchiveFiles};
use super::batch::{BatchImporter, GlossaryStore};
use super::blob::BlobStore;
use super::classify;
use super::dedup::{self, GlossaryLookup};
use super::error::{ImportError, Result};
use super::extract::{DefinitionExtractor, ExtractPolicy};
use super::models::{ClassifiedRecord, GlossaryEntry, ImportSummary, SkipCounts};
use super::{header, index};

/// Options controlling one import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Number of entries per store transaction.
    pub batch_size: usize,
    /// Enforce the word/definition length limits during extraction.
    /// There is no separate validation pass; this toggles the
    /// [`ExtractPolicy`] limits.
    pub validate_entries: bool,
    /// Filter entries already present in the glossary corpus.
    pub deduplicate: bool,
    /// Context string stamped on every imported entry.
    pub context: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            validate_entries: true,
            deduplicate: true,
            context: "imported".to_string(),
        }
    }
}

/// Pipeline stage named in progress notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Parsing,
    Extracting,
    Classifying,
    Deduplicating,
    Importing,
}

/// One progress notification: how far the named stage has come.
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate {
    pub stage: ImportStage,
    pub processed: usize,
    pub total: usize,
}

/// Receives progress notifications from a running import.
///
/// Delivery is best-effort and fire-and-forget; implementations must
/// not block the pipeline.
pub trait ProgressObserver {
    fn on_progress(&self, update: &ProgressUpdate);
}

/// Observer that discards every notification.
#[derive(Debug, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&self, _update: &ProgressUpdate) {}
}

/// Shared cancellation flag.
///
/// Checked between pipeline stages and between store chunks, so a
/// cancelled run never leaves a chunk half-written. Clone it and hand
/// the copy to whatever owns the caller's timeout mechanism.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Sequences the full import pipeline and produces an [`ImportSummary`].
///
/// Every run builds its state fresh from the archive files; nothing
/// persists on the importer between runs.
pub struct StardictImporter {
    options: ImportOptions,
    cancel: CancelFlag,
}

impl StardictImporter {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            cancel: CancelFlag::new(),
        }
    }

    /// Cancellation handle for this importer's runs.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Run the import pipeline against one archive.
    ///
    /// Fatal errors (missing file, malformed header, corrupt compressed
    /// stream, undecodable index word, cancellation) abort before
    /// batching with no partial persistence. Per-entry and per-chunk
    /// problems are folded into the summary counters instead.
    pub fn run<S>(
        &self,
        locator: &Path,
        store: &S,
        observer: &dyn ProgressObserver,
    ) -> Result<ImportSummary>
    where
        S: GlossaryStore + GlossaryLookup,
    {
        info!("Starting StarDict import from {}", locator.display());

        // Step 1: resolve and read the three archive files
        let files = ArchiveFiles::resolve(locator)?;
        let ifo_text = fs::read_to_string(&files.ifo)?;

        // Step 2: header
        let metadata = header::parse(&ifo_text)?;
        self.check_cancelled()?;

        // Step 3: decompress index and blob if their extension says so
        let idx_bytes = archive::read_maybe_gzip(&files.idx)?;
        let dict_bytes = archive::read_maybe_gzip(&files.dict)?;
        if idx_bytes.len() as u64 != metadata.idxfilesize {
            warn!(
                "Index size {} differs from declared idxfilesize {}",
                idx_bytes.len(),
                metadata.idxfilesize
            );
        }

        // Step 4: index
        let parsed = index::parse(&idx_bytes)?;
        let total_entries = parsed.entries.len();
        if total_entries == 0 {
            return Err(ImportError::InvalidFormat(
                "no entries found in archive index".to_string(),
            ));
        }
        if total_entries as u64 != metadata.wordcount {
            warn!(
                "Index holds {} entries but header declares wordcount={}",
                total_entries, metadata.wordcount
            );
        }
        observer.on_progress(&ProgressUpdate {
            stage: ImportStage::Parsing,
            processed: total_entries,
            total: total_entries,
        });
        self.check_cancelled()?;

        // Step 5: extraction (validation policy folded in)
        let blob = BlobStore::new(dict_bytes);
        let extractor = DefinitionExtractor::new(ExtractPolicy::new(self.options.validate_entries));
        let extraction = extractor.extract_all(&parsed.entries, &blob, &metadata.bookname);
        let skip_reasons = SkipCounts::tally(&extraction.skipped);
        observer.on_progress(&ProgressUpdate {
            stage: ImportStage::Extracting,
            processed: extraction.records.len(),
            total: total_entries,
        });
        self.check_cancelled()?;

        // Step 6: classification (pure, never fails)
        let classified: Vec<ClassifiedRecord> = extraction
            .records
            .into_iter()
            .map(|record| {
                let (script, gender_hint) = classify::classify(&record.word);
                ClassifiedRecord {
                    record,
                    script,
                    gender_hint,
                }
            })
            .collect();
        let processed_entries = classified.len();
        observer.on_progress(&ProgressUpdate {
            stage: ImportStage::Classifying,
            processed: processed_entries,
            total: processed_entries,
        });
        self.check_cancelled()?;

        // Step 7: deduplication
        let (survivors, duplicate_entries) = if self.options.deduplicate {
            let outcome = dedup::filter_existing(classified, store);
            (outcome.records, outcome.duplicates)
        } else {
            (classified, 0)
        };
        observer.on_progress(&ProgressUpdate {
            stage: ImportStage::Deduplicating,
            processed: survivors.len(),
            total: processed_entries,
        });
        self.check_cancelled()?;

        // Step 8: batched persistence
        let entries: Vec<GlossaryEntry> = survivors
            .iter()
            .map(|record| GlossaryEntry::from_classified(record, &self.options.context))
            .collect();
        let importer = BatchImporter::new(self.options.batch_size);
        let outcome = importer.import(&entries, store, &self.cancel, observer)?;

        // Step 9: summary
        let summary = ImportSummary {
            dictionary_name: metadata.bookname.clone(),
            source_path: locator.display().to_string(),
            context: self.options.context.clone(),
            total_entries,
            partial_index: parsed.partial,
            processed_entries,
            skipped_entries: skip_reasons.total(),
            skip_reasons,
            duplicate_entries,
            imported_entries: outcome.imported,
            failed_entries: outcome.failed,
            metadata,
            completed_at: Utc::now(),
        };

        info!(
            "StarDict import completed: {} imported, {} skipped, {} duplicates, {} failed",
            summary.imported_entries,
            summary.skipped_entries,
            summary.duplicate_entries,
            summary.failed_entries
        );
        Ok(summary)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(ImportError::Cancelled)
        } else {
            Ok(())
        }
    }
}
