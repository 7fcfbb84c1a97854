//! Input decoding: turn each export file into a sequence of ndjson lines.
//!
//! Auth0 delivers the user export gzip-compressed and the password hash
//! export as a zip archive with a single inner file. Both decoders fall back
//! to reading the file as plain text when the container format is not
//! recognized, so already-decompressed exports work too.
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

/// Magic bytes at the start of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("the hash export zip must contain exactly one file, found {count}: {path}")]
    ArchiveEntryCount { path: PathBuf, count: usize },
}

/// Split decoded text into ndjson lines, dropping blank lines.
fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the user export. Gzip is detected by magic bytes; anything else is
/// treated as already-decompressed ndjson. A corrupt stream behind a gzip
/// header is a hard error, not a fallback.
pub fn read_profile_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoder = GzDecoder::new(bytes.as_slice());
        let mut text = String::new();
        decoder
            .read_to_string(&mut text)
            .with_context(|| format!("gunzip {}", path.display()))?;
        Ok(split_lines(&text))
    } else {
        Ok(split_lines(&String::from_utf8_lossy(&bytes)))
    }
}

/// Read the password hash export. If the bytes form a zip archive it must
/// hold exactly one inner file; an unrecognized container falls back to
/// plain text.
pub fn read_hash_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    match zip::ZipArchive::new(Cursor::new(&bytes)) {
        Ok(mut archive) => {
            if archive.len() != 1 {
                return Err(DecodeError::ArchiveEntryCount {
                    path: path.to_path_buf(),
                    count: archive.len(),
                }
                .into());
            }
            let mut inner = archive
                .by_index(0)
                .with_context(|| format!("read zip entry in {}", path.display()))?;
            let mut text = String::new();
            inner
                .read_to_string(&mut text)
                .with_context(|| format!("decompress {}", path.display()))?;
            Ok(split_lines(&text))
        }
        Err(_) => Ok(split_lines(&String::from_utf8_lossy(&bytes))),
    }
}
