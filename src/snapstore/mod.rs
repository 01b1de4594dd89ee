//! snapstore — локальное хранилище батчей (undo store) для правок агента.
//!
//! Состав:
//! - SnapshotStore: корень хранилища, перечисление батчей, поиск по файлу, show.
//! - id: BatchId `<ordinal:03>_<YYYYMMDDTHHMMSS>` (UTC).
//! - metadata: metadata.json батча (original → snapshot).
//! - batch: create_batch — снимок текущего содержимого (all-or-nothing).
//! - mirror: LatestMirror — кэш последнего батча для детекции no-op.
//! - restore: восстановление всего батча или одного файла (best-effort по файлам).
//! - retention: RetentionPolicy + prune.
//!
//! Раскладка на диске:
//!   <store-root>/
//!     LOCK
//!     003_20240115T093000/{metadata.json, <basename>...}
//!     latest/<basename>...
//!
//! Корень передаётся явно (AyeConfig::store_root), глобального состояния нет.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AyeConfig;
use crate::error::{Error, IoContext, Result};
use crate::lock::{acquire_shared_lock, LockGuard};
use crate::util::resolve_path;

pub mod id;
pub mod metadata;
pub mod mirror;
pub mod retention;

mod batch;
mod restore;

pub use id::{now_stamp, BatchId, TIMESTAMP_FORMAT};
pub use metadata::{read_metadata, BatchMetadata, FileRecord, METADATA_FILE};
pub use mirror::LatestMirror;
pub use restore::RestoreReport;
pub use retention::{BatchStamp, RetentionPolicy};

/// One line of `history`: batch id plus captured file names.
/// `files == None` means metadata.json is missing or unparsable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchListing {
    pub id: BatchId,
    pub files: Option<Vec<String>>,
}

impl BatchListing {
    pub fn metadata_missing(&self) -> bool {
        self.files.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Open the store configured by `cfg` (directory created lazily on first write).
    pub fn open(cfg: &AyeConfig) -> Result<Self> {
        Self::open_at(cfg.store_root())
    }

    /// Open a store rooted at `root`.
    pub fn open_at<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if root.exists() && !root.is_dir() {
            return Err(Error::InvalidInput(format!(
                "store root {} is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: resolve_path(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn batch_dir(&self, id: &BatchId) -> PathBuf {
        self.root.join(id.dir_name())
    }

    pub fn mirror_dir(&self) -> PathBuf {
        LatestMirror::dir_in(&self.root)
    }

    /// All committed batches, ascending by ordinal.
    ///
    /// Only directories named `<digits>_<stamp>` count; `latest`, staging
    /// directories and stray files are skipped.
    pub fn batch_ids(&self) -> Result<Vec<BatchId>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for e in fs::read_dir(&self.root).io_context("read_dir", &self.root)? {
            let e = e.io_context("read_dir entry", &self.root)?;
            let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            let name = e.file_name();
            let Some(name) = name.to_str() else { continue };
            match BatchId::parse(name) {
                Some(id) => out.push(id),
                None => debug!("snapstore: skip non-batch entry {}", name),
            }
        }
        out.sort();
        Ok(out)
    }

    /// Newest committed batch, if any.
    pub fn latest_batch(&self) -> Result<Option<BatchId>> {
        Ok(self.batch_ids()?.pop())
    }

    /// Metadata of batch `id`.
    pub fn metadata(&self, id: &BatchId) -> Result<BatchMetadata> {
        read_metadata(&self.batch_dir(id), &id.to_string())
    }

    /// All batches, newest first, with the base names they captured.
    pub fn list_batches(&self) -> Result<Vec<BatchListing>> {
        let _lk = self.shared_lock()?;
        let mut out = Vec::new();
        for id in self.batch_ids()?.into_iter().rev() {
            let files = match self.metadata(&id) {
                Ok(m) => Some(m.file_names()),
                Err(e) => {
                    debug!("snapstore: list {}: {}", id, e);
                    None
                }
            };
            out.push(BatchListing { id, files });
        }
        Ok(out)
    }

    /// Batches that captured `path`, newest first, with the snapshot blob path.
    /// Batches with unreadable metadata are skipped.
    pub fn list_batches_for_file(&self, path: &Path) -> Result<Vec<(BatchId, PathBuf)>> {
        let target = resolve_path(path);
        let _lk = self.shared_lock()?;
        let mut out = Vec::new();
        for id in self.batch_ids()?.into_iter().rev() {
            let meta = match self.metadata(&id) {
                Ok(m) => m,
                Err(e) => {
                    debug!("snapstore: history {}: {}", id, e);
                    continue;
                }
            };
            for rec in meta.files {
                if rec.original_path == target {
                    out.push((id.clone(), rec.snapshot_path));
                }
            }
        }
        Ok(out)
    }

    /// Resolve a user-supplied batch selector.
    ///
    /// Accepts the full id (`003_20240115T093000`) or an ordinal in any
    /// zero padding (`3`, `003`).
    pub fn resolve_batch(&self, selector: &str) -> Result<BatchId> {
        let sel = selector.trim();
        if sel.is_empty() {
            return Err(Error::InvalidInput("empty batch selector".into()));
        }
        let ids = self.batch_ids()?;
        if let Some(id) = ids.iter().find(|id| id.to_string() == sel) {
            return Ok(id.clone());
        }
        if sel.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = sel.parse::<u64>() {
                if let Some(id) = ids.iter().rev().find(|id| id.ordinal == n) {
                    return Ok(id.clone());
                }
            }
        }
        Err(Error::NotFound(format!("snapshot with ordinal {sel} not found")))
    }

    /// Captured bytes of `path` in the batch picked by `selector`.
    pub fn show(&self, path: &Path, selector: &str) -> Result<Vec<u8>> {
        let target = resolve_path(path);
        let _lk = self.shared_lock()?;
        let id = self.resolve_batch(selector)?;
        let meta = self.metadata(&id)?;
        let rec = meta
            .files
            .iter()
            .find(|r| r.original_path == target)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "file {} not captured in snapshot {}",
                    target.display(),
                    id
                ))
            })?;
        let blob = self.locate_blob(&id, rec).ok_or_else(|| {
            Error::NotFound(format!(
                "snapshot blob missing: {}",
                rec.snapshot_path.display()
            ))
        })?;
        fs::read(&blob).io_context("read snapshot", &blob)
    }

    /// Where the blob for `rec` actually lives: the recorded path, or the
    /// same name inside the batch directory if the store has been moved.
    pub(crate) fn locate_blob(&self, id: &BatchId, rec: &FileRecord) -> Option<PathBuf> {
        if rec.snapshot_path.is_file() {
            return Some(rec.snapshot_path.clone());
        }
        let name = rec.snapshot_path.file_name()?;
        let local = self.batch_dir(id).join(name);
        local.is_file().then_some(local)
    }

    /// Mirror view matching the newest batch (empty if none or unreadable).
    pub(crate) fn load_mirror(&self) -> LatestMirror {
        let latest = match self.latest_batch() {
            Ok(Some(id)) => id,
            _ => return LatestMirror::empty(&self.root),
        };
        match self.metadata(&latest) {
            Ok(meta) => LatestMirror::from_latest(&self.root, &meta),
            Err(e) => {
                debug!("snapstore: mirror fallback (latest {}): {}", latest, e);
                LatestMirror::empty(&self.root)
            }
        }
    }

    fn shared_lock(&self) -> Result<Option<LockGuard>> {
        if !self.root.is_dir() {
            return Ok(None);
        }
        acquire_shared_lock(&self.root).map(Some)
    }
}
