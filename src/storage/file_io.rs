//! File I/O utilities with atomic writes
//!
//! Every write goes to a sibling temp file first and is renamed into place, so
//! a crash leaves either the old file or the new one, never a truncated mix.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

/// Read JSON from a file, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, LedgerError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    read_json_existing(path)
}

/// Read JSON from a file that is expected to exist
pub fn read_json_existing<T, P>(path: P) -> Result<T, LedgerError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| LedgerError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| LedgerError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Sibling path used while a file is being written
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("file"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);

    let result = (|| -> Result<(), LedgerError> {
        let file = File::create(&temp_path)
            .map_err(|e| LedgerError::Storage(format!("Failed to create temp file: {}", e)))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data)
            .map_err(|e| LedgerError::Storage(format!("Failed to serialize data: {}", e)))?;
        writer.write_all(b"\n")?;

        writer
            .flush()
            .map_err(|e| LedgerError::Storage(format!("Failed to flush data: {}", e)))?;

        // Sync to disk before rename
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| LedgerError::Storage(format!("Failed to sync data: {}", e)))?;

        fs::rename(&temp_path, path)
            .map_err(|e| LedgerError::Storage(format!("Failed to rename temp file: {}", e)))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Copy a file atomically into `dest`, returning the number of bytes copied
pub fn copy_atomic(source: &Path, dest: &Path) -> Result<u64, LedgerError> {
    let temp_path = temp_path_for(dest);

    let result = (|| -> Result<u64, LedgerError> {
        let bytes = fs::copy(source, &temp_path)?;
        File::open(&temp_path)?.sync_all()?;
        fs::rename(&temp_path, dest)?;
        Ok(bytes)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}
