//! snapstore/restore — восстановление файлов из батча.
//!
//! restore(batch?, file_name?):
//! - batch не задан → самый новый батч (по ordinal); пустое хранилище → NotFound.
//! - batch ищется по полному id или по ordinal (`2`, `002`); нет → NotFound.
//! - metadata.json отсутствует/битый → CorruptMetadata.
//! - file_name задан → только записи с таким base name; ни одной → NotFound
//!   (до какой-либо записи на диск).
//! - Пропавший блоб: warn + продолжаем с остальными (частичный restore).
//! - Ошибка записи оригинала: warn + путь в `failed`, остальные файлы
//!   восстанавливаются (best-effort по файлам).

use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, IoContext, Result};
use crate::lock::acquire_exclusive_lock;
use crate::util::ensure_parent;

use super::id::BatchId;
use super::SnapshotStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub batch: BatchId,
    /// Originals overwritten with their captured content.
    pub restored: Vec<PathBuf>,
    /// Snapshot blobs that were not found (their originals were left alone).
    pub missing: Vec<PathBuf>,
    /// Originals that could not be written.
    pub failed: Vec<PathBuf>,
}

impl RestoreReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }
}

impl SnapshotStore {
    pub fn restore(&self, batch: Option<&str>, file_name: Option<&str>) -> Result<RestoreReport> {
        if !self.root().is_dir() {
            return Err(Error::NotFound("no snapshots found".into()));
        }
        let _lk = acquire_exclusive_lock(self.root())?;

        let id = match batch {
            Some(sel) => self.resolve_batch(sel)?,
            None => self
                .latest_batch()?
                .ok_or_else(|| Error::NotFound("no snapshots found".into()))?,
        };
        let meta = self.metadata(&id)?;

        let records: Vec<_> = match file_name {
            Some(name) => {
                let picked: Vec<_> = meta
                    .files
                    .into_iter()
                    .filter(|r| r.original_name() == name)
                    .collect();
                if picked.is_empty() {
                    return Err(Error::NotFound(format!(
                        "file '{}' not found in snapshot {}",
                        name, id
                    )));
                }
                picked
            }
            None => meta.files,
        };

        let mut report = RestoreReport {
            batch: id.clone(),
            restored: Vec::new(),
            missing: Vec::new(),
            failed: Vec::new(),
        };

        for rec in &records {
            let Some(blob) = self.locate_blob(&id, rec) else {
                warn!(
                    "restore: snapshot file missing – {} (batch {}, original {})",
                    rec.snapshot_path.display(),
                    id,
                    rec.original_path.display()
                );
                report.missing.push(rec.snapshot_path.clone());
                continue;
            };
            let copied = ensure_parent(&rec.original_path).and_then(|()| {
                fs::copy(&blob, &rec.original_path)
                    .map(|_| ())
                    .io_context("restore", &rec.original_path)
            });
            match copied {
                Ok(()) => report.restored.push(rec.original_path.clone()),
                Err(e) => {
                    warn!("restore: batch {}: {}", id, e);
                    report.failed.push(rec.original_path.clone());
                }
            }
        }

        info!(
            "restore: batch {}: {} restored, {} missing, {} failed",
            id,
            report.restored.len(),
            report.missing.len(),
            report.failed.len()
        );
        Ok(report)
    }
}
