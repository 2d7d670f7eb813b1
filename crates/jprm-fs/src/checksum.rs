//! MD5 checksum utilities
//!
//! Package checksums are plain lowercase MD5 hex digests, and the sidecar
//! files use the `md5sum` binary-mode line format (`<hex> *<file name>`),
//! so they can be verified with `md5sum -c`.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

use crate::{Error, Result};

/// Extension appended to an archive path to name its checksum sidecar.
pub const SIDECAR_EXTENSION: &str = "md5sum";

const CHUNK_SIZE: usize = 1_048_576;

/// Compute the MD5 checksum of in-memory content.
pub fn compute_content_checksum(content: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Compute the MD5 checksum of a file, reading it in 1 MiB chunks.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buf).map_err(|e| Error::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Path of the checksum sidecar belonging to `path`.
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(SIDECAR_EXTENSION);
    PathBuf::from(name)
}

/// Format a single checksum line.
pub fn format_checksum_line(checksum: &str, file_name: &str) -> String {
    format!("{checksum} *{file_name}\n")
}

/// Compute the checksum of `path` and write it to `<path>.md5sum`.
///
/// Returns the checksum.
pub fn write_checksum_file(path: &Path) -> Result<String> {
    let checksum = compute_file_checksum(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let sidecar = sidecar_path(path);
    std::fs::write(&sidecar, format_checksum_line(&checksum, &file_name))
        .map_err(|e| Error::io(&sidecar, e))?;

    tracing::debug!("Wrote checksum {} to {}", checksum, sidecar.display());
    Ok(checksum)
}

/// A parsed checksum line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumEntry {
    pub checksum: String,
    pub file_name: String,
}

/// Parse the contents of a checksum file.
///
/// Accepts both binary (`<hex> *<name>`) and text (`<hex>  <name>`) lines.
pub fn parse_checksum_file(path: &Path, content: &str) -> Result<Vec<ChecksumEntry>> {
    let mut entries = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let malformed = || Error::ChecksumFormat {
            path: path.to_path_buf(),
            line: line.to_string(),
        };

        let (checksum, rest) = line.split_once(' ').ok_or_else(malformed)?;
        let file_name = rest
            .strip_prefix('*')
            .or_else(|| rest.strip_prefix(' '))
            .ok_or_else(malformed)?;

        if checksum.is_empty()
            || file_name.is_empty()
            || !checksum.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(malformed());
        }

        entries.push(ChecksumEntry {
            checksum: checksum.to_ascii_lowercase(),
            file_name: file_name.to_string(),
        });
    }

    Ok(entries)
}

/// Verify every entry of a checksum file against the files next to it.
///
/// Returns `false` as soon as one file does not match.
pub fn verify_checksum_file(sidecar: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(sidecar).map_err(|e| Error::io(sidecar, e))?;
    let entries = parse_checksum_file(sidecar, &content)?;
    let base = sidecar.parent().unwrap_or_else(|| Path::new("."));

    for entry in &entries {
        let actual = compute_file_checksum(&base.join(&entry.file_name))?;
        if actual != entry.checksum {
            tracing::warn!(
                "Checksum mismatch for {}: expected {}, got {}",
                entry.file_name,
                entry.checksum,
                actual
            );
            return Ok(false);
        }
    }

    Ok(!entries.is_empty())
}
