use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;

use aye::{AyeConfig, SnapshotStore};

use crate::util::project_path;

/// История: все батчи (новые сверху) или только батчи, где есть файл.
pub fn exec(cfg: &AyeConfig, file: Option<PathBuf>, json: bool) -> Result<()> {
    let store = SnapshotStore::open(cfg)?;

    match file {
        None => {
            let batches = store
                .list_batches()
                .with_context(|| format!("list batches at {}", store.root().display()))?;
            if json {
                let arr: Vec<_> = batches
                    .iter()
                    .map(|b| {
                        json!({
                            "id": b.id.to_string(),
                            "ordinal": b.id.ordinal,
                            "timestamp": b.id.stamp,
                            "files": b.files,
                            "metadata_missing": b.metadata_missing(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&arr)?);
                return Ok(());
            }
            if batches.is_empty() {
                println!("No snapshots found.");
                return Ok(());
            }
            println!("Snapshot History:");
            for b in &batches {
                match &b.files {
                    Some(files) => println!("  {}  {}", b.id.label(), files.join(",")),
                    None => println!("  {}  (metadata missing)", b.id.label()),
                }
            }
        }
        Some(f) => {
            let target = project_path(cfg, &f);
            let snaps = store
                .list_batches_for_file(&target)
                .with_context(|| format!("list batches for {}", target.display()))?;
            if json {
                let arr: Vec<_> = snaps
                    .iter()
                    .map(|(id, snap)| json!({"id": id.to_string(), "snapshot": snap}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&arr)?);
                return Ok(());
            }
            if snaps.is_empty() {
                println!("No snapshots found.");
                return Ok(());
            }
            for (id, _) in snaps {
                println!("{id}");
            }
        }
    }
    Ok(())
}
