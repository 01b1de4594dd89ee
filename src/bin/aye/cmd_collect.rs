use anyhow::{Context, Result};

use aye::{collect_sources, AyeConfig, CollectOptions};

pub fn exec(cfg: &AyeConfig, mask: Option<String>, recursive: bool, json: bool) -> Result<()> {
    let mut opts = CollectOptions::from(cfg).recursive(recursive);
    if let Some(m) = mask {
        opts.file_mask = m;
    }
    let sources = collect_sources(&opts)
        .with_context(|| format!("collect sources under {}", opts.root.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }
    for (path, text) in &sources {
        println!("{:8} B  {}", text.len(), path);
    }
    println!("{} file(s)", sources.len());
    Ok(())
}
