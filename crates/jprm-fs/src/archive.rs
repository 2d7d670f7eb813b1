//! Zip archive creation and inspection

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::{Error, Result};

/// Upper bound on the buffer reserved up front from an entry's declared size.
const MAX_INITIAL_CAPACITY: u64 = 16 * 1024 * 1024;

/// Zip the contents of `source_dir` into `archive_path`.
///
/// Entries are rooted at the archive root, use forward slashes, and are
/// deflate-compressed. Directories get their own entries.
pub fn zip_directory(archive_path: &Path, source_dir: &Path) -> Result<()> {
    let file = File::create(archive_path).map_err(|e| Error::io(archive_path, e))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source_dir).to_path_buf();
            Error::io(path, io::Error::other(e.to_string()))
        })?;
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(source_dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer
                .add_directory(name, options)
                .map_err(|e| Error::archive(archive_path, e))?;
        } else {
            tracing::debug!("Adding {} to {}", name, archive_path.display());
            writer
                .start_file(name, options)
                .map_err(|e| Error::archive(archive_path, e))?;
            let mut source = File::open(path).map_err(|e| Error::io(path, e))?;
            io::copy(&mut source, &mut writer).map_err(|e| Error::io(path, e))?;
        }
    }

    writer
        .finish()
        .map_err(|e| Error::archive(archive_path, e))?;
    Ok(())
}

fn open(archive_path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(archive_path).map_err(|e| Error::io(archive_path, e))?;
    ZipArchive::new(file).map_err(|e| Error::archive(archive_path, e))
}

/// Check whether `path` is a readable zip archive.
pub fn is_zip(path: &Path) -> bool {
    open(path).is_ok()
}

/// List the entry names of an archive.
pub fn entry_names(archive_path: &Path) -> Result<Vec<String>> {
    let archive = open(archive_path)?;
    Ok(archive.file_names().map(str::to_string).collect())
}

/// Read a single entry from an archive.
///
/// Returns `None` when the archive has no entry with that name.
pub fn read_entry(archive_path: &Path, name: &str) -> Result<Option<Vec<u8>>> {
    let mut archive = open(archive_path)?;

    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(Error::archive(archive_path, e)),
    };

    let mut buf = Vec::with_capacity(initial_capacity(entry.size()));
    entry
        .read_to_end(&mut buf)
        .map_err(|e| Error::io(archive_path, e))?;
    Ok(Some(buf))
}

// The declared size comes from the archive header and is not trusted.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_INITIAL_CAPACITY)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_capacity_is_capped() {
        assert_eq!(initial_capacity(0), 0);
        assert_eq!(initial_capacity(4096), 4096);
        assert_eq!(initial_capacity(u64::MAX), 16 * 1024 * 1024);
    }
}
