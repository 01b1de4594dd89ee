//! snapstore/metadata — per-batch metadata.json.
//!
//! Формат (pretty JSON, совместим с существующими стораджами):
//! {
//!   "timestamp": "20240115T093000",
//!   "files": [ {"original": "/abs/path/main.py", "snapshot": "/abs/store/003_.../main.py"}, ... ]
//! }
//!
//! Запись атомарна (tmp+rename). Отсутствие или битый JSON → Error::CorruptMetadata
//! с id батча, чтобы вызывающий мог выбрать другой батч.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::util::{base_name, write_atomic};

pub const METADATA_FILE: &str = "metadata.json";

/// One captured file within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(rename = "original")]
    pub original_path: PathBuf,
    #[serde(rename = "snapshot")]
    pub snapshot_path: PathBuf,
}

impl FileRecord {
    pub fn original_name(&self) -> String {
        base_name(&self.original_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub timestamp: String,
    pub files: Vec<FileRecord>,
}

impl BatchMetadata {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            files: Vec::new(),
        }
    }

    pub fn add(&mut self, original: PathBuf, snapshot: PathBuf) {
        self.files.push(FileRecord {
            original_path: original,
            snapshot_path: snapshot,
        });
    }

    /// Base names of the original files, in capture order.
    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(FileRecord::original_name).collect()
    }
}

pub fn metadata_path(batch_dir: &Path) -> PathBuf {
    batch_dir.join(METADATA_FILE)
}

pub fn write_metadata(batch_dir: &Path, meta: &BatchMetadata) -> Result<PathBuf> {
    let path = metadata_path(batch_dir);
    let json = serde_json::to_vec_pretty(meta).map_err(|e| {
        Error::io(
            "serialize metadata",
            &path,
            io::Error::new(io::ErrorKind::InvalidData, e),
        )
    })?;
    write_atomic(&path, &json)?;
    Ok(path)
}

/// Read metadata of batch `batch` stored in `batch_dir`.
pub fn read_metadata(batch_dir: &Path, batch: &str) -> Result<BatchMetadata> {
    let path = metadata_path(batch_dir);
    let bytes = match fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::corrupt(batch, "metadata.json missing"));
        }
        Err(e) => return Err(Error::io("read metadata", &path, e)),
    };
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::corrupt(batch, format!("parse metadata.json: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape_uses_original_snapshot_keys() {
        let mut m = BatchMetadata::new("20240115T093000");
        m.add(PathBuf::from("/p/main.py"), PathBuf::from("/s/001_x/main.py"));
        let v: serde_json::Value = serde_json::to_value(&m).unwrap();
        assert_eq!(v["timestamp"], "20240115T093000");
        assert_eq!(v["files"][0]["original"], "/p/main.py");
        assert_eq!(v["files"][0]["snapshot"], "/s/001_x/main.py");
        assert_eq!(m.file_names(), vec!["main.py".to_string()]);
    }
}
