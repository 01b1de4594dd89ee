//! ChangeApplier: snapshot-then-write for an externally proposed edit set.
//!
//! Порядок для каждого файла строго: захват в батч → перезапись. Если процесс
//! прервётся между шагами, старое содержимое остаётся в только что созданном батче.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AyeConfig;
use crate::error::{Error, IoContext, Result};
use crate::snapstore::{BatchId, SnapshotStore};
use crate::util::{ensure_parent, join_root, read_if_exists};

/// One proposed edit. Accepts both `{path, content}` and the
/// `{file_name, file_content}` shape emitted by the inference service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    #[serde(alias = "file_name")]
    pub path: String,
    #[serde(alias = "file_content")]
    pub content: String,
}

impl Edit {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Batch holding the pre-edit content; None when no capture was needed.
    pub batch: Option<BatchId>,
    /// Files overwritten, in edit order.
    pub written: Vec<PathBuf>,
    /// Files whose proposed content equals what is on disk.
    pub unchanged: Vec<PathBuf>,
}

impl ApplyOutcome {
    pub fn is_noop(&self) -> bool {
        self.written.is_empty()
    }

    /// Batch id as the external handle; empty string for a no-op.
    pub fn batch_id(&self) -> String {
        self.batch.as_ref().map(|b| b.to_string()).unwrap_or_default()
    }
}

pub struct ChangeApplier {
    store: SnapshotStore,
    project_root: PathBuf,
}

impl ChangeApplier {
    pub fn new(store: SnapshotStore, project_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            project_root: project_root.into(),
        }
    }

    pub fn from_config(cfg: &AyeConfig) -> Result<Self> {
        Ok(Self::new(SnapshotStore::open(cfg)?, cfg.project_root.clone()))
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Capture, then overwrite.
    ///
    /// 1) Drop edits whose content equals the file on disk (missing or
    ///    unreadable files always count as changed). Repeated paths: last edit wins.
    /// 2) create_batch over what is left.
    /// 3) Write each remaining edit, creating parent directories.
    ///
    /// If create_batch reports nothing new to capture (content already equals
    /// the latest batch's copy) the writes still happen: the pre-edit bytes are
    /// recoverable from that earlier batch.
    pub fn apply_updates(&self, edits: &[Edit]) -> Result<ApplyOutcome> {
        if edits.is_empty() {
            return Err(Error::InvalidInput("empty edit set".into()));
        }

        let mut pending: Vec<(PathBuf, &str)> = Vec::with_capacity(edits.len());
        for e in edits {
            if e.path.trim().is_empty() {
                return Err(Error::InvalidInput("edit with empty path".into()));
            }
            let t = join_root(&self.project_root, Path::new(&e.path));
            match pending.iter_mut().find(|(p, _)| *p == t) {
                Some(slot) => slot.1 = e.content.as_str(),
                None => pending.push((t, e.content.as_str())),
            }
        }

        let mut outcome = ApplyOutcome::default();
        let mut to_write = Vec::with_capacity(pending.len());
        for (path, content) in pending {
            let same = match read_if_exists(&path) {
                Ok(Some(cur)) => cur == content.as_bytes(),
                Ok(None) => false,
                Err(err) => {
                    debug!("apply: {} unreadable ({}), treating as changed", path.display(), err);
                    false
                }
            };
            if same {
                debug!("apply: {} unchanged, skipped", path.display());
                outcome.unchanged.push(path);
            } else {
                to_write.push((path, content));
            }
        }

        if to_write.is_empty() {
            info!("apply: no changes to apply");
            return Ok(outcome);
        }

        let paths: Vec<&Path> = to_write.iter().map(|(p, _)| p.as_path()).collect();
        outcome.batch = self.store.create_batch(&paths)?;

        for (path, content) in to_write {
            ensure_parent(&path)?;
            fs::write(&path, content.as_bytes()).io_context("write", &path)?;
            outcome.written.push(path);
        }

        info!(
            "apply: {} file(s) written, {} unchanged, batch={}",
            outcome.written.len(),
            outcome.unchanged.len(),
            outcome
                .batch
                .as_ref()
                .map(|b| b.to_string())
                .unwrap_or_else(|| "(none)".to_string())
        );
        Ok(outcome)
    }
}
