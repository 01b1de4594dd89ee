use anyhow::{Context, Result};

use aye::{AyeConfig, SnapshotStore};

pub fn exec(cfg: &AyeConfig, count: Option<usize>) -> Result<()> {
    let keep = count.unwrap_or(cfg.keep_default);
    let store = SnapshotStore::open(cfg)?;
    let deleted = store
        .prune(keep)
        .with_context(|| format!("prune snapshots at {}", store.root().display()))?;
    println!("✅ {} snapshots pruned. {} most recent kept.", deleted, keep);
    Ok(())
}
