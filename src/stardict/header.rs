//! StarDict `.ifo` header parsing.

use std::collections::BTreeMap;

use log::{debug, info};

use super::error::{ImportError, Result};
use super::models::ArchiveMetadata;

/// Signature prefix expected on the first line of every `.ifo` file.
const IFO_SIGNATURE: &str = "StarDict's dict ifo file";

/// Parse the text content of a `.ifo` header file.
///
/// Header structure:
/// ```text
/// StarDict's dict ifo file
/// version=2.4.2
/// bookname=Monier-Williams Sanskrit-English
/// wordcount=160000
/// idxfilesize=3024324
/// ```
///
/// The first `=` on a line separates key from value; later `=`
/// characters stay in the value. Lines without `=` are ignored.
/// `wordcount` and `idxfilesize` are coerced to integers.
pub fn parse(content: &str) -> Result<ArchiveMetadata> {
    info!("Parsing .ifo header");

    let mut lines = content.lines();
    let signature = lines.next().unwrap_or("").trim();
    if !signature.starts_with(IFO_SIGNATURE) {
        return Err(ImportError::InvalidFormat(format!(
            "not a StarDict .ifo file (first line {:?})",
            signature
        )));
    }

    let mut fields = BTreeMap::new();
    for line in lines {
        if let Some((key, value)) = line.trim().split_once('=') {
            fields.insert(key.to_string(), value.to_string());
        }
    }

    let version = take_required(&mut fields, "version")?;
    let bookname = take_required(&mut fields, "bookname")?;
    let wordcount = parse_count(take_required(&mut fields, "wordcount")?, "wordcount")?;
    let idxfilesize = parse_count(take_required(&mut fields, "idxfilesize")?, "idxfilesize")?;

    info!("Header parsed: {} ({} words)", bookname, wordcount);
    debug!(
        "Header fields: version={}, idxfilesize={}, {} extra keys",
        version,
        idxfilesize,
        fields.len()
    );

    Ok(ArchiveMetadata {
        version,
        bookname,
        wordcount,
        idxfilesize,
        extra: fields,
    })
}

fn take_required(fields: &mut BTreeMap<String, String>, key: &'static str) -> Result<String> {
    fields.remove(key).ok_or(ImportError::MissingField(key))
}

fn parse_count(value: String, field: &'static str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ImportError::MalformedValue { field, value })
}
