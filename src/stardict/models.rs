//! Data structures representing archive components and import results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Parsed metadata from a StarDict `.ifo` header file.
///
/// Immutable once parsed; every parse call produces a fresh value with
/// no state carried over between archives.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveMetadata {
    pub version: String,
    pub bookname: String,
    pub wordcount: u64,
    pub idxfilesize: u64,
    /// Remaining `key=value` pairs the header carried beyond the
    /// required four (`sametypesequence`, `author`, ...).
    pub extra: BTreeMap<String, String>,
}

/// One `.idx` record: a word and the span of its definition in the blob.
///
/// Sequence order is the archive's native order. It is preserved through
/// extraction but carries no semantic guarantee beyond reproducibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub word: String,
    pub offset: u32,
    pub length: u32,
}

/// A word/definition pair extracted from the blob, before classification.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub word: String,
    pub definition: String,
    pub source_archive: String,
}

/// Writing system assigned to an extracted word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Devanagari,
    Iast,
    Romanized,
}

/// Grammatical gender guessed from word suffixes.
///
/// Heuristic output only, never a validated linguistic fact. A missing
/// hint (`None` at the use site) is a valid result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
}

/// A [`RawRecord`] enriched with script and gender classification.
#[derive(Debug, Clone)]
pub struct ClassifiedRecord {
    pub record: RawRecord,
    pub script: Script,
    pub gender_hint: Option<Gender>,
}

/// The persistence shape handed to the glossary store.
///
/// Exactly one of the `word_*` fields is populated at creation: the one
/// matching the classified script. The store assigns identifiers and
/// timestamps internally.
#[derive(Debug, Clone, Serialize)]
pub struct GlossaryEntry {
    pub word_devanagari: Option<String>,
    pub word_iast: Option<String>,
    pub word_romanized: Option<String>,
    pub meaning_english: String,
    pub part_of_speech: Option<String>,
    pub gender: Option<Gender>,
    pub context: String,
    pub source: String,
    pub frequency: u32,
    pub is_verified: bool,
}

impl GlossaryEntry {
    /// Build the persistence shape from a classified record.
    pub fn from_classified(classified: &ClassifiedRecord, context: &str) -> Self {
        let word = classified.record.word.clone();
        let (word_devanagari, word_iast, word_romanized) = match classified.script {
            Script::Devanagari => (Some(word), None, None),
            Script::Iast => (None, Some(word), None),
            Script::Romanized => (None, None, Some(word)),
        };
        Self {
            word_devanagari,
            word_iast,
            word_romanized,
            meaning_english: classified.record.definition.clone(),
            part_of_speech: None,
            gender: classified.gender_hint,
            context: context.to_string(),
            source: classified.record.source_archive.clone(),
            frequency: 1,
            is_verified: false,
        }
    }

    /// The word form populated at creation, whichever script it is.
    pub fn word(&self) -> &str {
        self.word_devanagari
            .as_deref()
            .or(self.word_iast.as_deref())
            .or(self.word_romanized.as_deref())
            .unwrap_or_default()
    }
}

/// Why an index entry was skipped during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `offset + length` pointed past the end of the definition blob.
    OffsetOutOfBounds,
    /// Word or definition was empty after sanitizing.
    EmptyContent,
    /// Word or definition exceeded the configured length limits.
    TooLong,
}

/// Diagnostic record of one skipped entry.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedWord {
    pub word: String,
    pub reason: SkipReason,
}

/// Extraction-time skip tallies, broken out by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub offset_out_of_bounds: usize,
    pub empty_content: usize,
    pub too_long: usize,
}

impl SkipCounts {
    pub fn tally(skipped: &[SkippedWord]) -> Self {
        let mut counts = Self::default();
        for skip in skipped {
            match skip.reason {
                SkipReason::OffsetOutOfBounds => counts.offset_out_of_bounds += 1,
                SkipReason::EmptyContent => counts.empty_content += 1,
                SkipReason::TooLong => counts.too_long += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.offset_out_of_bounds + self.empty_content + self.too_long
    }
}

/// Final report of one import run.
///
/// Skips happen at two distinct pipeline stages and are reported as two
/// distinct counters: `skipped_entries` (extraction-time, detailed in
/// `skip_reasons`) and `duplicate_entries` (deduplication-time). They are
/// deliberately not reconciled into a single arithmetic identity with
/// `processed_entries`.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub dictionary_name: String,
    pub source_path: String,
    pub context: String,
    /// Entries found in the `.idx` file.
    pub total_entries: usize,
    /// True when the `.idx` file ended mid-entry and a truncated tail
    /// was dropped.
    pub partial_index: bool,
    /// Records that survived extraction and classification.
    pub processed_entries: usize,
    /// Entries dropped during extraction.
    pub skipped_entries: usize,
    pub skip_reasons: SkipCounts,
    /// Records dropped because the glossary already held their word form.
    pub duplicate_entries: usize,
    /// Records committed to the store.
    pub imported_entries: usize,
    /// Records lost to failed store chunks.
    pub failed_entries: usize,
    pub metadata: ArchiveMetadata,
    pub completed_at: DateTime<Utc>,
}
