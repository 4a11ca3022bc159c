//! Definition extraction and sanitizing.

use std::sync::OnceLock;

use encoding_rs::UTF_8;
use log::{debug, info};
use regex::Regex;

use super::blob::BlobStore;
use super::models::{IndexEntry, RawRecord, SkipReason, SkippedWord};

static CONTROL_CHARS: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_RUNS: OnceLock<Regex> = OnceLock::new();

/// ASCII and C1 control characters (U+0000–U+001F, U+007F–U+009F).
fn control_chars() -> &'static Regex {
    CONTROL_CHARS
        .get_or_init(|| Regex::new(r"[\x00-\x1F\x7F-\u{9F}]").expect("Invalid control char pattern"))
}

fn whitespace_runs() -> &'static Regex {
    WHITESPACE_RUNS.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace pattern"))
}

/// Sanitizing and validation rules applied to every extracted entry.
///
/// The length limits carry the caller's `validate_entries` option:
/// validation is not a separate pipeline pass, it is this policy applied
/// during extraction. Emptiness checks always run.
#[derive(Debug, Clone, Copy)]
pub struct ExtractPolicy {
    /// Maximum word length in code points.
    pub max_word_len: usize,
    /// Maximum definition length in code points.
    pub max_definition_len: usize,
    /// When false, the length limits above are not enforced.
    pub enforce_limits: bool,
}

impl ExtractPolicy {
    pub fn new(enforce_limits: bool) -> Self {
        Self {
            max_word_len: 255,
            max_definition_len: 10_000,
            enforce_limits,
        }
    }
}

impl Default for ExtractPolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Outcome of extracting all index entries against a blob.
///
/// `skipped` is the per-entry diagnostic log; one bad entry never aborts
/// the run.
#[derive(Debug)]
pub struct ExtractionOutcome {
    pub records: Vec<RawRecord>,
    pub skipped: Vec<SkippedWord>,
}

/// Pulls and sanitizes one definition string per index entry.
#[derive(Debug)]
pub struct DefinitionExtractor {
    policy: ExtractPolicy,
}

impl DefinitionExtractor {
    pub fn new(policy: ExtractPolicy) -> Self {
        Self { policy }
    }

    /// Extract a [`RawRecord`] for every entry whose span and content
    /// survive the policy, preserving archive order.
    pub fn extract_all(
        &self,
        entries: &[IndexEntry],
        blob: &BlobStore,
        source_archive: &str,
    ) -> ExtractionOutcome {
        info!(
            "Extracting {} definitions from {} byte blob",
            entries.len(),
            blob.len()
        );

        let mut records = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();

        for entry in entries {
            match self.extract_one(entry, blob, source_archive) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    debug!("Skipping entry {:?}: {:?}", entry.word, reason);
                    skipped.push(SkippedWord {
                        word: entry.word.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            "Extracted {} definitions, skipped {}",
            records.len(),
            skipped.len()
        );
        ExtractionOutcome { records, skipped }
    }

    fn extract_one(
        &self,
        entry: &IndexEntry,
        blob: &BlobStore,
        source_archive: &str,
    ) -> std::result::Result<RawRecord, SkipReason> {
        let bytes = blob
            .slice(entry.offset, entry.length)
            .map_err(|_| SkipReason::OffsetOutOfBounds)?;

        let word = entry.word.trim().to_string();
        let definition = sanitize_definition(bytes);

        if word.is_empty() || definition.is_empty() {
            return Err(SkipReason::EmptyContent);
        }
        if self.policy.enforce_limits
            && (word.chars().count() > self.policy.max_word_len
                || definition.chars().count() > self.policy.max_definition_len)
        {
            return Err(SkipReason::TooLong);
        }

        Ok(RawRecord {
            word,
            definition,
            source_archive: source_archive.to_string(),
        })
    }
}

/// Decode definition bytes and clean them up for storage.
///
/// Archives are not always strictly clean UTF-8, so invalid sequences
/// are replaced rather than rejected. Control characters become spaces,
/// whitespace runs collapse to a single space, and the result is
/// trimmed.
fn sanitize_definition(bytes: &[u8]) -> String {
    let (decoded, _, _) = UTF_8.decode(bytes);
    let stripped = control_chars().replace_all(&decoded, " ");
    let collapsed = whitespace_runs().replace_all(&stripped, " ");
    collapsed.trim().to_string()
}
