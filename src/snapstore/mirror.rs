//! snapstore/mirror — LatestMirror: copies of the files from the most recent batch.
//!
//! Layout: <store-root>/latest/<blob-name>, same blob names as in the batch
//! directory, no metadata of its own. Which original a blob belongs to is
//! taken from the latest batch's metadata.json; if that cannot be read the
//! mirror is treated as empty and every path counts as changed.
//!
//! The mirror is a cache. Losing it only costs an extra capture.

use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoContext, Result};
use crate::util::read_if_exists;

use super::metadata::BatchMetadata;

pub const MIRROR_DIR: &str = "latest";

#[derive(Debug)]
pub struct LatestMirror {
    dir: PathBuf,
    /// original path -> blob name inside `dir`
    entries: HashMap<PathBuf, String>,
}

impl LatestMirror {
    pub fn dir_in(store_root: &Path) -> PathBuf {
        store_root.join(MIRROR_DIR)
    }

    /// Empty mirror view (no knowledge of previous content).
    pub fn empty(store_root: &Path) -> Self {
        Self {
            dir: Self::dir_in(store_root),
            entries: HashMap::new(),
        }
    }

    /// Mirror view keyed by the latest batch's records.
    pub fn from_latest(store_root: &Path, latest: &BatchMetadata) -> Self {
        let mut m = Self::empty(store_root);
        if !m.dir.is_dir() {
            return m;
        }
        for rec in &latest.files {
            if let Some(blob) = rec.snapshot_path.file_name() {
                m.entries.insert(
                    rec.original_path.clone(),
                    blob.to_string_lossy().into_owned(),
                );
            }
        }
        m
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Has `path` (resolved, absolute) changed since it was last captured?
    ///
    /// Changed when: not a regular file, unknown to the mirror, mirror blob
    /// missing, or bytes differ.
    pub fn is_changed(&self, path: &Path) -> Result<bool> {
        if !path.is_file() {
            return Ok(true);
        }
        let Some(blob) = self.entries.get(path) else {
            return Ok(true);
        };
        let mirrored = self.dir.join(blob);
        let Some(old) = read_if_exists(&mirrored)? else {
            return Ok(true);
        };
        // длины различаются → изменён, без чтения файла
        let cur_len = fs::metadata(path).io_context("stat", path)?.len();
        if cur_len != old.len() as u64 {
            return Ok(true);
        }
        let cur = fs::read(path).io_context("read", path)?;
        let changed = cur != old;
        debug!(
            "mirror: {} {}",
            path.display(),
            if changed { "changed" } else { "unchanged" }
        );
        Ok(changed)
    }

    /// Wholesale replace the mirror with copies of the given blobs.
    ///
    /// `blobs` are (source-in-batch, blob-name). Built in `latest.tmp`, old
    /// mirror removed, then renamed into place.
    pub fn replace(store_root: &Path, blobs: &[(PathBuf, String)]) -> Result<()> {
        let dir = Self::dir_in(store_root);
        let staging = store_root.join(format!("{MIRROR_DIR}.tmp"));
        if staging.exists() {
            fs::remove_dir_all(&staging).io_context("remove stale mirror staging", &staging)?;
        }
        fs::create_dir_all(&staging).io_context("create mirror staging", &staging)?;
        for (src, name) in blobs {
            let dst = staging.join(name);
            fs::copy(src, &dst).io_context("copy into mirror", &dst)?;
        }
        if dir.exists() {
            fs::remove_dir_all(&dir).io_context("remove old mirror", &dir)?;
        }
        fs::rename(&staging, &dir).io_context("install mirror", &dir)?;
        Ok(())
    }

    /// Drop the mirror (and any staging leftovers).
    pub fn clear(store_root: &Path) -> Result<()> {
        for d in [
            Self::dir_in(store_root),
            store_root.join(format!("{MIRROR_DIR}.tmp")),
        ] {
            if d.exists() {
                fs::remove_dir_all(&d).io_context("remove mirror", &d)?;
            }
        }
        Ok(())
    }
}
