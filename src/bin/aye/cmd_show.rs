use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use aye::{AyeConfig, SnapshotStore};

use crate::util::project_path;

pub fn exec(cfg: &AyeConfig, file: PathBuf, batch: String) -> Result<()> {
    let store = SnapshotStore::open(cfg)?;
    let target = project_path(cfg, &file);
    let bytes = store
        .show(&target, &batch)
        .with_context(|| format!("show {} in snapshot {}", target.display(), batch))?;
    let mut out = std::io::stdout().lock();
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(())
}
