//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::{Error, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partially
/// written file, and a failed write leaves the original untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file lives in the same directory so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let result = write_temp(&temp_path, path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp(temp_path: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: target.to_path_buf(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Copy a file through [`write_atomic`], creating the destination directory
/// if needed.
///
/// Returns `false` without touching anything when `from` and `to` are the
/// same file.
pub fn copy_file(from: &Path, to: &Path) -> Result<bool> {
    if is_same_file(from, to) {
        tracing::info!("{} is already in place, skipping copy", to.display());
        return Ok(false);
    }
    let content = fs::read(from).map_err(|e| Error::io(from, e))?;
    write_atomic(to, &content)?;
    Ok(true)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Write `content` to `path` unless the file already holds identical bytes.
///
/// Returns `true` when the file was written.
pub fn write_if_changed(path: &Path, content: &[u8]) -> Result<bool> {
    if let Ok(meta) = fs::metadata(path) {
        if meta.len() == content.len() as u64 {
            let existing = fs::read(path).map_err(|e| Error::io(path, e))?;
            if existing == content {
                tracing::info!("Existing {} is identical, skipping write", path.display());
                return Ok(false);
            }
        } else {
            tracing::info!("Existing {} differs in size ({})", path.display(), meta.len());
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    tracing::info!("Writing {}", path.display());
    fs::write(path, content).map_err(|e| Error::io(path, e))?;
    Ok(true)
}
