//! Archive file resolution and decompression.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, info};

use super::error::{ImportError, Result};

/// Resolved paths of the three files making up one archive.
#[derive(Debug, Clone)]
pub struct ArchiveFiles {
    pub ifo: PathBuf,
    pub idx: PathBuf,
    pub dict: PathBuf,
}

impl ArchiveFiles {
    /// Resolve the three co-located archive files from a locator.
    ///
    /// The locator may be any one of the three files (its stem, with a
    /// trailing `.gz` peeled off first, names the archive) or a
    /// directory (the first `.ifo` inside names it). The index and blob
    /// fall back to their `.gz` siblings when the plain file is absent.
    pub fn resolve(locator: &Path) -> Result<Self> {
        info!("Resolving archive files from {}", locator.display());

        let (base_dir, base_name) = if locator.is_dir() {
            (locator.to_path_buf(), find_ifo_stem(locator)?)
        } else {
            let dir = locator.parent().unwrap_or(Path::new(".")).to_path_buf();
            (dir, base_stem(locator))
        };

        let ifo = base_dir.join(format!("{}.ifo", base_name));
        let idx = with_gz_fallback(&base_dir, &base_name, "idx");
        let dict = with_gz_fallback(&base_dir, &base_name, "dict");

        for path in [&ifo, &idx, &dict] {
            if !path.exists() {
                return Err(ImportError::FileNotFound(path.clone()));
            }
        }

        debug!(
            "Resolved archive: ifo={}, idx={}, dict={}",
            ifo.display(),
            idx.display(),
            dict.display()
        );
        Ok(Self { ifo, idx, dict })
    }
}

/// Read a file, transparently gunzipping when its extension says so.
///
/// Decompression failure means the archive itself is unusable, so it is
/// fatal rather than a per-entry skip.
pub fn read_maybe_gzip(path: &Path) -> Result<Vec<u8>> {
    let raw = fs::read(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        debug!("Decompressing {} ({} bytes)", path.display(), raw.len());
        let mut decoder = GzDecoder::new(raw.as_slice());
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| ImportError::CorruptArchive {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(decompressed)
    } else {
        Ok(raw)
    }
}

/// Derive the archive base name from one of its files.
fn base_stem(path: &Path) -> String {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(name);
    match name.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name.to_string(),
    }
}

/// Find the first `.ifo` file in a directory and return its stem.
fn find_ifo_stem(dir: &Path) -> Result<String> {
    let mut ifo_names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".ifo"))
        .collect();
    ifo_names.sort();

    match ifo_names.first() {
        Some(name) => Ok(name.trim_end_matches(".ifo").to_string()),
        None => Err(ImportError::FileNotFound(dir.join("*.ifo"))),
    }
}

fn with_gz_fallback(dir: &Path, base_name: &str, extension: &str) -> PathBuf {
    let plain = dir.join(format!("{}.{}", base_name, extension));
    if plain.exists() {
        plain
    } else {
        dir.join(format!("{}.{}.gz", base_name, extension))
    }
}
