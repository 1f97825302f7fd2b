// LogDeck - platform/fs.rs
//
// Filesystem helpers for the export path.
//
// Files are written atomically (write temp, rename to final) so an
// interrupted export never leaves a half-written file under the final name.

use crate::util::error::ExportError;
use std::path::{Path, PathBuf};

/// Sibling temp path used while writing `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `bytes` to `path` atomically, creating missing parent directories.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let io_err = |target: &Path| {
        let target = target.to_path_buf();
        move |e: std::io::Error| ExportError::Io {
            path: target,
            source: e,
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let tmp = temp_path(path);
    std::fs::write(&tmp, bytes).map_err(io_err(&tmp))?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        // Leave nothing behind on failure.
        let _ = std::fs::remove_file(&tmp);
        return Err(ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        });
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "File written atomically");
    Ok(())
}

/// Resolve an export destination: an explicit path wins, otherwise
/// `file_name` inside `directory`.
pub fn resolve_export_path(explicit: Option<&Path>, directory: &Path, file_name: &str) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => directory.join(file_name),
    }
}
