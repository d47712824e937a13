use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Write `value` as pretty JSON, replacing `path` atomically.
///
/// The file is written to a sibling `.tmp` path, synced, then renamed over the
/// target, so readers never observe a half-written file.
pub fn write_json_atomic<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), ExportError> {
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let f = fs::File::create(&temp_path)?;
    let written = serde_json::to_writer_pretty(&f, value)
        .map_err(ExportError::from)
        .and_then(|()| f.sync_all().map_err(ExportError::from));
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
