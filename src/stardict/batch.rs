//! Batched persistence into the glossary store.

use log::{debug, warn};

use super::error::{ImportError, PersistenceError, Result};
use super::importer::{CancelFlag, ImportStage, ProgressObserver, ProgressUpdate};
use super::models::GlossaryEntry;

/// Persistence capability of the target glossary store.
///
/// The store assigns identifiers and timestamps internally and must
/// treat each call as one all-or-nothing transactional unit.
pub trait GlossaryStore {
    fn insert_batch(&self, entries: &[GlossaryEntry]) -> std::result::Result<(), PersistenceError>;
}

/// Counters accumulated across one batched persistence pass.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub imported: usize,
    pub failed: usize,
    /// Indices of the chunks whose insert failed.
    pub failed_chunks: Vec<usize>,
}

/// Persists surviving records in fixed-size transactional chunks.
pub struct BatchImporter {
    batch_size: usize,
}

impl BatchImporter {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Persist `entries` in order, one `insert_batch` call per chunk.
    ///
    /// Each chunk is an independent unit: a failed insert adds the
    /// chunk's size to the failed counter, logs the chunk index, and
    /// processing continues with the next chunk. Retry policy, if any,
    /// belongs to the store. Cancellation is honored between chunks,
    /// never mid-chunk.
    pub fn import(
        &self,
        entries: &[GlossaryEntry],
        store: &dyn GlossaryStore,
        cancel: &CancelFlag,
        observer: &dyn ProgressObserver,
    ) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();

        for (chunk_idx, chunk) in entries.chunks(self.batch_size).enumerate() {
            if cancel.is_cancelled() {
                return Err(ImportError::Cancelled);
            }
            match store.insert_batch(chunk) {
                Ok(()) => {
                    outcome.imported += chunk.len();
                    debug!("Imported chunk {}: {} entries", chunk_idx, chunk.len());
                }
                Err(e) => {
                    outcome.failed += chunk.len();
                    outcome.failed_chunks.push(chunk_idx);
                    warn!(
                        "Failed to import chunk {} ({} entries): {}",
                        chunk_idx,
                        chunk.len(),
                        e
                    );
                }
            }
            observer.on_progress(&ProgressUpdate {
                stage: ImportStage::Importing,
                processed: outcome.imported + outcome.failed,
                total: entries.len(),
            });
        }

        Ok(outcome)
    }
}
