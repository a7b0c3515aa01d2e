//! Append-only audit log
//!
//! One JSON object per line (JSONL), flushed after every entry.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, LedgerResult};

use super::entry::AuditEntry;

/// Writes audit entries to the log file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Append an entry
    pub fn log(&self, entry: &AuditEntry) -> LedgerResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| LedgerError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .and_then(|_| file.flush())
            .map_err(|e| LedgerError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Read every entry, oldest first
    pub fn read_all(&self) -> LedgerResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                LedgerError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{parse_timestamp, Transaction};
    use tempfile::TempDir;

    #[test]
    fn test_log_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        assert!(logger.read_all().unwrap().is_empty());

        let txn = Transaction::new("Coffee", parse_timestamp("2024-01-05").unwrap());
        logger.log(&AuditEntry::created(&txn)).unwrap();
        logger.log(&AuditEntry::deleted(&txn)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[1].operation, Operation::Delete);
        assert_eq!(entries[1].transaction_id, txn.id);

        let raw = std::fs::read_to_string(logger.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
    }

    #[test]
    fn test_corrupt_line_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audit.log");
        std::fs::write(&path, "{broken\n").unwrap();

        let err = AuditLogger::new(path).read_all().unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
