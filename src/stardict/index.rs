//! StarDict `.idx` binary index parsing.

use byteorder::{BigEndian, ByteOrder};
use log::{info, warn};

use super::error::{ImportError, Result};
use super::models::IndexEntry;

/// Result of scanning an `.idx` buffer.
#[derive(Debug)]
pub struct ParsedIndex {
    pub entries: Vec<IndexEntry>,
    /// True when the buffer ended mid-entry and the truncated tail was
    /// dropped.
    pub partial: bool,
}

/// Parse a decompressed `.idx` buffer into its index entries.
///
/// Entry layout, repeated to the end of the buffer:
/// ```text
/// [N bytes] word, UTF-8, NUL-terminated
/// [4 bytes] definition offset in the blob (big-endian u32)
/// [4 bytes] definition length in bytes (big-endian u32)
/// ```
///
/// A truncated tail (no further NUL, or fewer than 8 bytes after one)
/// stops the scan; entries collected so far are returned with `partial`
/// set. Re-parsing identical bytes always yields identical output.
///
/// A word that is not valid UTF-8 is a hard failure: a corrupt word
/// list cannot be trusted structurally.
pub fn parse(data: &[u8]) -> Result<ParsedIndex> {
    info!("Parsing .idx index ({} bytes)", data.len());

    let mut entries = Vec::new();
    let mut cursor = 0usize;
    let mut partial = false;

    while cursor < data.len() {
        let Some(nul) = data[cursor..].iter().position(|&b| b == 0).map(|p| cursor + p) else {
            partial = true;
            break;
        };
        // The word's NUL must be followed by the two u32 span fields.
        if nul + 9 > data.len() {
            partial = true;
            break;
        }

        let word = std::str::from_utf8(&data[cursor..nul])
            .map_err(|e| {
                ImportError::InvalidFormat(format!(
                    "invalid UTF-8 in index word at byte offset {}: {}",
                    cursor, e
                ))
            })?
            .to_string();

        let offset = BigEndian::read_u32(&data[nul + 1..nul + 5]);
        let length = BigEndian::read_u32(&data[nul + 5..nul + 9]);

        entries.push(IndexEntry {
            word,
            offset,
            length,
        });
        cursor = nul + 9;
    }

    if partial {
        warn!(
            "Truncated .idx tail at byte {}; recovered {} entries",
            cursor,
            entries.len()
        );
    } else {
        info!("Parsed .idx index: {} entries", entries.len());
    }

    Ok(ParsedIndex { entries, partial })
}
