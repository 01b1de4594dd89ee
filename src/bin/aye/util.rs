use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use aye::AyeConfig;

/// Read a JSON argument from a file (`-` = stdin) or from an inline string.
pub fn read_json_arg(file: Option<PathBuf>, inline: Option<String>, what: &str) -> Result<String> {
    match (file, inline) {
        (Some(p), _) if p.as_os_str() == "-" => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read stdin")?;
            Ok(s)
        }
        (Some(p), _) => {
            std::fs::read_to_string(&p).with_context(|| format!("read {} {}", what, p.display()))
        }
        (None, Some(s)) => Ok(s),
        (None, None) => anyhow::bail!("provide --{what}-file or --{what}-json"),
    }
}

/// CLI file arguments are relative to the project root, like edit paths.
pub fn project_path(cfg: &AyeConfig, p: &Path) -> PathBuf {
    cfg.resolve_path(p)
}
