use anyhow::{Context, Result};
use std::path::PathBuf;

use aye::{AyeConfig, ChangeApplier, Edit};

use crate::util::read_json_arg;

/// CLI: apply --edits-file edits.json | --edits-json '[...]'
pub fn exec(cfg: &AyeConfig, edits_file: Option<PathBuf>, edits_json: Option<String>) -> Result<()> {
    let raw = read_json_arg(edits_file, edits_json, "edits")?;
    let edits: Vec<Edit> = serde_json::from_str(&raw).context("parse edits json")?;

    let applier = ChangeApplier::from_config(cfg)?;
    let outcome = applier
        .apply_updates(&edits)
        .with_context(|| format!("apply {} edit(s)", edits.len()))?;

    if outcome.is_noop() {
        println!("No changes to apply.");
        return Ok(());
    }
    for p in &outcome.written {
        println!("  updated {}", p.display());
    }
    match &outcome.batch {
        Some(id) => println!("✅ {} file(s) updated (snapshot {})", outcome.written.len(), id),
        None => println!(
            "✅ {} file(s) updated (content already captured in the latest snapshot)",
            outcome.written.len()
        ),
    }
    Ok(())
}
