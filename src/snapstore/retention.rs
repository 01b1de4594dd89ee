//! snapstore/retention — which batches survive a prune, and the prune itself.
//!
//! Policy is a pure function over (id, created_at): sort ascending by
//! timestamp (ties broken by ordinal), keep the last `keep_count`.

use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::fs;

use crate::error::Result;
use crate::lock::acquire_exclusive_lock;

use super::id::BatchId;
use super::mirror::LatestMirror;
use super::SnapshotStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStamp {
    pub id: BatchId,
    pub created_at: NaiveDateTime,
}

impl BatchStamp {
    /// None when the id's stamp is not a valid timestamp.
    pub fn from_id(id: BatchId) -> Option<Self> {
        let created_at = id.created_at()?;
        Some(Self { id, created_at })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub keep_count: usize,
}

impl RetentionPolicy {
    pub fn keep(keep_count: usize) -> Self {
        Self { keep_count }
    }

    /// Batches to delete, oldest first. Empty when `total <= keep_count`.
    pub fn expired(&self, batches: &[BatchStamp]) -> Vec<BatchId> {
        if batches.len() <= self.keep_count {
            return Vec::new();
        }
        let mut sorted: Vec<&BatchStamp> = batches.iter().collect();
        sorted.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        let n = sorted.len() - self.keep_count;
        sorted.into_iter().take(n).map(|b| b.id.clone()).collect()
    }
}

impl SnapshotStore {
    /// Delete all but the `keep_count` most recent batches.
    /// Returns how many were actually deleted; failures are logged and skipped.
    pub fn prune(&self, keep_count: usize) -> Result<usize> {
        if !self.root().is_dir() {
            return Ok(0);
        }
        let _lk = acquire_exclusive_lock(self.root())?;

        let ids = self.batch_ids()?;
        let newest_before = ids.last().cloned();
        let stamps: Vec<BatchStamp> = ids
            .into_iter()
            .filter_map(|id| {
                let label = id.to_string();
                let s = BatchStamp::from_id(id);
                if s.is_none() {
                    debug!("prune: skip {} (unparsable timestamp)", label);
                }
                s
            })
            .collect();

        let doomed = RetentionPolicy::keep(keep_count).expired(&stamps);
        let mut deleted = 0usize;
        for id in &doomed {
            let dir = self.batch_dir(id);
            match fs::remove_dir_all(&dir) {
                Ok(()) => {
                    debug!("prune: removed {}", id);
                    deleted += 1;
                }
                Err(e) => warn!("prune: cannot remove {}: {}", dir.display(), e),
            }
        }

        // mirror описывает самый новый батч; если он удалён — кэш больше не валиден
        if self.batch_ids()?.last().cloned() != newest_before {
            if let Err(e) = LatestMirror::clear(self.root()) {
                warn!("prune: cannot drop mirror: {}", e);
            }
        }

        info!(
            "prune: {} batch(es) deleted, keep_count={}",
            deleted, keep_count
        );
        Ok(deleted)
    }
}
