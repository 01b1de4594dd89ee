//! File-based locking for single-writer safety of a snapshot store.
//!
//! Cross-platform (fs2) advisory locks:
//! - Exclusive: batch creation, restore, prune. Serializes ordinal allocation
//!   so two cooperating processes never pick the same ordinal.
//! - Shared: listing / show.
//!
//! Lock file path: <store-root>/LOCK
//! Lock is released on Drop.

use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{IoContext, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

#[derive(Debug)]
pub struct LockGuard {
    file: std::fs::File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

pub fn lock_file_path(store_root: &Path) -> PathBuf {
    store_root.join("LOCK")
}

/// Acquire a lock in the requested mode. Blocks until acquired.
/// Creates the store root if it does not exist yet.
pub fn acquire_lock(store_root: &Path, mode: LockMode) -> Result<LockGuard> {
    fs::create_dir_all(store_root).io_context("create store root", store_root)?;
    let path = lock_file_path(store_root);
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .io_context("open lock file", &path)?;
    match mode {
        LockMode::Shared => file.lock_shared().io_context("lock_shared", &path)?,
        LockMode::Exclusive => file.lock_exclusive().io_context("lock_exclusive", &path)?,
    }
    Ok(LockGuard { file })
}

pub fn acquire_exclusive_lock(store_root: &Path) -> Result<LockGuard> {
    acquire_lock(store_root, LockMode::Exclusive)
}

pub fn acquire_shared_lock(store_root: &Path) -> Result<LockGuard> {
    acquire_lock(store_root, LockMode::Shared)
}
