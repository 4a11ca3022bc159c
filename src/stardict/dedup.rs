//! Deduplication against the existing glossary corpus.

use std::collections::HashSet;

use log::{debug, info, warn};

use super::error::PersistenceError;
use super::models::{ClassifiedRecord, Script};

/// Lookup capability of the target glossary store.
pub trait GlossaryLookup {
    /// Return which of the candidate word forms already exist in the
    /// corpus, across both the Devanagari and IAST columns.
    fn exists_any(
        &self,
        devanagari: &[String],
        iast: &[String],
    ) -> std::result::Result<HashSet<String>, PersistenceError>;
}

/// Outcome of one deduplication pass.
#[derive(Debug)]
pub struct DedupOutcome {
    pub records: Vec<ClassifiedRecord>,
    pub duplicates: usize,
}

/// Drop records whose classified word form already exists in the corpus.
///
/// Issues exactly one batched existence query per run. Records without a
/// Devanagari or IAST form (pure romanized words) always pass through:
/// the corpus has no column to match them against. That is a documented
/// limitation of the mechanism, not something to paper over here.
///
/// A failed lookup is logged and the whole batch passes unfiltered; the
/// store's own uniqueness constraints remain the final guard.
pub fn filter_existing(
    records: Vec<ClassifiedRecord>,
    lookup: &dyn GlossaryLookup,
) -> DedupOutcome {
    info!("Deduplicating {} records against glossary", records.len());

    let devanagari: Vec<String> = candidate_words(&records, Script::Devanagari);
    let iast: Vec<String> = candidate_words(&records, Script::Iast);

    if devanagari.is_empty() && iast.is_empty() {
        debug!("No deduplicatable word forms in batch");
        return DedupOutcome {
            records,
            duplicates: 0,
        };
    }

    let existing = match lookup.exists_any(&devanagari, &iast) {
        Ok(existing) => existing,
        Err(e) => {
            warn!("Glossary lookup failed, importing without deduplication: {}", e);
            return DedupOutcome {
                records,
                duplicates: 0,
            };
        }
    };

    let before = records.len();
    let records: Vec<ClassifiedRecord> = records
        .into_iter()
        .filter(|r| match r.script {
            Script::Devanagari | Script::Iast => !existing.contains(&r.record.word),
            Script::Romanized => true,
        })
        .collect();
    let duplicates = before - records.len();

    info!("Deduplicated: {} unique records, {} duplicates dropped", records.len(), duplicates);
    DedupOutcome {
        records,
        duplicates,
    }
}

fn candidate_words(records: &[ClassifiedRecord], script: Script) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.script == script)
        .map(|r| r.record.word.clone())
        .collect()
}
