//! snapstore/batch — создание батча (снимок текущего содержимого перед записью).
//!
//! Сценарий create_batch(paths):
//! 1) Разрешаем пути в абсолютные, убираем дубликаты (порядок сохраняется).
//! 2) Под эксклюзивным LOCK сравниваем каждый путь с LatestMirror; неизменённые
//!    отбрасываем. Если ничего не изменилось — Ok(None), на диске ничего не создаётся.
//! 3) ordinal = max(существующие) + 1; собираем батч в `.<id>.tmp`
//!    (копии файлов или пустые плейсхолдеры + metadata.json).
//! 4) rename `.<id>.tmp` → `<id>` — точка коммита. Любая ошибка до неё
//!    удаляет staging целиком: частичных батчей не бывает.
//! 5) Перестраиваем latest/ из блобов нового батча (best-effort: при ошибке
//!    mirror удаляется, батч остаётся валидным).

use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, IoContext, Result};
use crate::lock::acquire_exclusive_lock;
use crate::util::{base_name, resolve_path, tmp_sibling};

use super::id::{now_stamp, BatchId};
use super::metadata::{write_metadata, BatchMetadata, METADATA_FILE};
use super::mirror::LatestMirror;
use super::SnapshotStore;

const STAGING_SUFFIX: &str = ".tmp";

impl SnapshotStore {
    /// Capture the current content of every changed path as one new batch.
    ///
    /// Returns `Ok(None)` when nothing changed since the last capture (no
    /// directory is created). Paths that do not exist yet are captured as
    /// empty placeholders so that undo also covers agent-created files.
    pub fn create_batch<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Option<BatchId>> {
        if paths.is_empty() {
            return Err(Error::InvalidInput("no files supplied for snapshot".into()));
        }

        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(paths.len());
        for p in paths {
            let p = p.as_ref();
            if p.as_os_str().is_empty() {
                return Err(Error::InvalidInput("empty file path in snapshot set".into()));
            }
            let r = resolve_path(p);
            if r.file_name().is_none() {
                return Err(Error::InvalidInput(format!(
                    "{} has no file name",
                    p.display()
                )));
            }
            if seen.insert(r.clone()) {
                resolved.push(r);
            }
        }

        let _lk = acquire_exclusive_lock(self.root())?;

        let mirror = self.load_mirror();
        let mut changed = Vec::new();
        for p in resolved {
            if mirror.is_changed(&p)? {
                debug!("snapshot: capture {}", p.display());
                changed.push(p);
            } else {
                debug!("snapshot: unchanged {}", p.display());
            }
        }
        if changed.is_empty() {
            info!("snapshot: no changes since last capture, batch skipped");
            return Ok(None);
        }

        self.sweep_staging();

        let ordinal = self
            .batch_ids()?
            .last()
            .map(|id| id.ordinal + 1)
            .unwrap_or(1);
        let id = BatchId::new(ordinal, now_stamp());
        let final_dir = self.batch_dir(&id);
        if final_dir.exists() {
            return Err(Error::io(
                "create batch dir",
                &final_dir,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "batch already exists"),
            ));
        }
        let staging = self.root().join(format!(".{}{}", id, STAGING_SUFFIX));

        fs::create_dir_all(&staging).io_context("create batch dir", &staging)?;
        let blobs = match fill_batch(&staging, &final_dir, &id, &changed) {
            Ok(b) => b,
            Err(e) => {
                let _ = fs::remove_dir_all(&staging);
                return Err(e);
            }
        };
        if let Err(e) = fs::rename(&staging, &final_dir) {
            let _ = fs::remove_dir_all(&staging);
            return Err(Error::io("commit batch dir", &final_dir, e));
        }

        // Коллизии имён (a/x.py и b/x.py) в mirror не попадают: для них
        // детекция no-op невозможна, будет повторный захват.
        let mirror_blobs: Vec<(PathBuf, String)> = blobs
            .into_iter()
            .filter(|b| !b.collided)
            .map(|b| (final_dir.join(&b.name), b.name))
            .collect();
        if let Err(e) = LatestMirror::replace(self.root(), &mirror_blobs) {
            warn!("snapshot: mirror refresh failed for {}: {}; dropping mirror", id, e);
            let _ = LatestMirror::clear(self.root());
        }

        info!(
            "snapshot: batch {} created ({} file(s)) at {}",
            id,
            changed.len(),
            final_dir.display()
        );
        Ok(Some(id))
    }

    /// Remove `.<id>.tmp` leftovers from interrupted captures. Caller holds the lock.
    fn sweep_staging(&self) {
        let Ok(rd) = fs::read_dir(self.root()) else { return };
        for e in rd.flatten() {
            let name = e.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with('.') && name.ends_with(STAGING_SUFFIX) {
                match fs::remove_dir_all(e.path()) {
                    Ok(()) => debug!("snapshot: removed stale staging {}", name),
                    Err(err) => warn!("snapshot: cannot remove stale staging {}: {}", name, err),
                }
            }
        }
    }
}

struct Blob {
    name: String,
    collided: bool,
}

/// Copy every changed file into `staging` and write metadata pointing at `final_dir`.
fn fill_batch(
    staging: &Path,
    final_dir: &Path,
    id: &BatchId,
    changed: &[PathBuf],
) -> Result<Vec<Blob>> {
    let mut meta = BatchMetadata::new(id.stamp.clone());
    let mut blobs: Vec<Blob> = Vec::with_capacity(changed.len());
    let mut taken: HashSet<String> = HashSet::new();
    // metadata.json и его временный файл — не для блобов
    let meta_file = staging.join(METADATA_FILE);
    taken.insert(METADATA_FILE.to_string());
    taken.insert(base_name(&tmp_sibling(&meta_file)));

    for src in changed {
        let base = base_name(src);
        let mut name = base.clone();
        let mut k = 1;
        while taken.contains(&name) {
            name = format!("{base}.{k}");
            k += 1;
        }
        let collided = name != base;
        if collided {
            // первый владелец имени тоже не годится для mirror
            if let Some(first) = blobs.iter_mut().find(|b| b.name == base) {
                first.collided = true;
            }
        }
        taken.insert(name.clone());

        let dst = staging.join(&name);
        if src.is_file() {
            fs::copy(src, &dst).io_context("copy", src)?;
        } else {
            fs::write(&dst, b"").io_context("write placeholder", &dst)?;
        }
        meta.add(src.clone(), final_dir.join(&name));
        blobs.push(Blob { name, collided });
    }

    write_metadata(staging, &meta)?;
    Ok(blobs)
}
