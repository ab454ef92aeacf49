//! ZIP extraction for design-tool exports
//!
//! Guards against:
//! - Entries escaping the archive root (`../`, absolute paths)
//! - Excessive entry counts
//! - Excessive total extracted size

use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

use crate::error::ArchiveError;

/// Maximum number of entries allowed in an archive.
const MAX_ENTRY_COUNT: usize = 10_000;

/// Maximum total extracted size (500 MB).
const MAX_EXTRACTED_SIZE: u64 = 500_000_000;

/// One file from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Path inside the archive, `/`-separated
    pub path: String,
    pub data: Vec<u8>,
}

/// Extract every file entry of `zip_bytes` in archive order. Directory entries are skipped.
pub fn extract(zip_bytes: &[u8]) -> Result<Vec<ExtractedFile>, ArchiveError> {
    extract_within(zip_bytes, MAX_EXTRACTED_SIZE)
}

/// Extraction with an explicit ceiling on the total decompressed size.
///
/// Header sizes are only used to reject early; the ceiling is enforced on the bytes
/// the decompressor actually produces.
fn extract_within(zip_bytes: &[u8], max_size: u64) -> Result<Vec<ExtractedFile>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(zip_bytes))?;

    if archive.len() > MAX_ENTRY_COUNT {
        return Err(ArchiveError::TooManyEntries(MAX_ENTRY_COUNT));
    }

    let mut files = Vec::new();
    let mut total_size: u64 = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let raw_name = entry.name().to_string();
        let path = entry
            .enclosed_name()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| ArchiveError::UnsafePath(raw_name.clone()))?;
        let path = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        // total_size <= max_size holds here
        let remaining = max_size - total_size;
        if entry.size() > remaining {
            return Err(ArchiveError::TooLarge(max_size));
        }

        let mut data = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        (&mut entry)
            .take(remaining + 1)
            .read_to_end(&mut data)
            .map_err(|source| ArchiveError::Read {
                path: raw_name,
                source,
            })?;

        total_size += data.len() as u64;
        if total_size > max_size {
            return Err(ArchiveError::TooLarge(max_size));
        }

        debug!("Extracted {} ({} bytes)", path, data.len());
        files.push(ExtractedFile { path, data });
    }

    Ok(files)
}
