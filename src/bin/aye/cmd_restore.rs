use anyhow::{Context, Result};

use aye::{AyeConfig, SnapshotStore};

/// CLI: restore [BATCH] [FILE]
pub fn exec(cfg: &AyeConfig, batch: Option<String>, file: Option<String>) -> Result<()> {
    let store = SnapshotStore::open(cfg)?;
    let report = store
        .restore(batch.as_deref(), file.as_deref())
        .with_context(|| {
            format!(
                "restore snapshot {} (file={})",
                batch.as_deref().unwrap_or("latest"),
                file.as_deref().unwrap_or("*")
            )
        })?;

    let target = match &batch {
        Some(_) => report.batch.to_string(),
        None => format!("latest snapshot ({})", report.batch),
    };
    if report.is_complete() {
        match &file {
            Some(f) => println!("✅ File '{}' restored to {}", f, target),
            None => println!("✅ All files restored to {}", target),
        }
        return Ok(());
    }

    println!(
        "⚠️  Partially restored to {}: {} restored, {} missing, {} failed",
        target,
        report.restored.len(),
        report.missing.len(),
        report.failed.len()
    );
    for m in &report.missing {
        println!("  warning: snapshot file missing – {}", m.display());
    }
    for f in &report.failed {
        println!("  error: could not restore {}", f.display());
    }
    if !report.failed.is_empty() {
        anyhow::bail!(
            "{} file(s) could not be restored from {}",
            report.failed.len(),
            report.batch
        );
    }
    Ok(())
}
