//! Output file writers.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::error::{Error, Result};

/// Creates the parent directory of `path` and any missing ancestors.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Copies `from` to `to` byte for byte, replacing any existing file.
pub fn copy_verbatim(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map_err(|source| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Writes `data` to `path` atomically.
///
/// The bytes go to a temporary file next to `path` which is renamed over it
/// once complete, so readers never observe a truncated file. The temporary
/// file is removed if anything fails.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = temp_file_in(dir).map_err(|e| Error::file_write(path, e))?;
    tmp.write_all(data).map_err(|e| Error::file_write(path, e))?;
    tmp.as_file().sync_all().map_err(|e| Error::file_write(path, e))?;
    tmp.persist(path).map_err(|e| Error::file_write(path, e.error))?;
    Ok(())
}

/// Creates the temporary file with the same umask-filtered mode a plain
/// `fs::write` would get, instead of tempfile's owner-only default.
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}
