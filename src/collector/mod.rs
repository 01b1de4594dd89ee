//! collector — relative path → text content for the remote inference step.
//!
//! Правила:
//! - любой компонент пути, начинающийся с `.`, исключается всегда;
//! - file mask (через запятую: `*.py,*.rs`) проверяется по base name;
//! - `.ayeignore` в корне: `dir/` режет каталоги на любой глубине, остальные
//!   шаблоны — glob по base name и по полному относительному пути;
//! - не-UTF-8 и нечитаемые файлы пропускаются с warn.
//!
//! Ключи — POSIX-пути относительно корня; BTreeMap даёт стабильный порядок.

use ignore::WalkBuilder;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::AyeConfig;
use crate::error::{Error, Result};

pub mod glob;
pub mod ignore_file;

pub use glob::glob_match;
pub use ignore_file::IgnoreRules;

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub root: PathBuf,
    pub file_mask: String,
    pub recursive: bool,
    /// Ignore file name under `root`; None disables ignore rules.
    pub ignore_file: Option<String>,
}

impl CollectOptions {
    pub fn new(root: impl Into<PathBuf>, file_mask: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_mask: file_mask.into(),
            recursive: true,
            ignore_file: Some(crate::config::DEFAULT_IGNORE_FILE.to_string()),
        }
    }

    pub fn recursive(mut self, on: bool) -> Self {
        self.recursive = on;
        self
    }

    pub fn ignore_file(mut self, name: Option<String>) -> Self {
        self.ignore_file = name;
        self
    }

    fn masks(&self) -> Vec<&str> {
        let v: Vec<&str> = self
            .file_mask
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if v.is_empty() {
            vec!["*"]
        } else {
            v
        }
    }
}

impl From<&AyeConfig> for CollectOptions {
    fn from(cfg: &AyeConfig) -> Self {
        Self {
            root: cfg.project_root.clone(),
            file_mask: cfg.file_mask.clone(),
            recursive: cfg.recursive,
            ignore_file: Some(cfg.ignore_file.clone()),
        }
    }
}

/// POSIX-style relative path; None if `path` is not under `root`.
fn posix_relative(root: &Path, path: &Path) -> Option<(String, Vec<String>)> {
    let rel = path.strip_prefix(root).ok()?;
    let comps: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if comps.is_empty() {
        return None;
    }
    Some((comps.join("/"), comps))
}

pub fn collect_sources(opts: &CollectOptions) -> Result<BTreeMap<String, String>> {
    let root = opts.root.as_path();
    if !root.is_dir() {
        return Err(Error::InvalidInput(format!(
            "'{}' is not a valid directory",
            root.display()
        )));
    }

    let rules = match &opts.ignore_file {
        Some(name) => IgnoreRules::load(&root.join(name))?,
        None => IgnoreRules::default(),
    };
    let masks = opts.masks();

    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .hidden(true)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    if !opts.recursive {
        walker.max_depth(Some(1));
    }
    {
        // каталоги из `dir/`-правил отсекаем до спуска в них
        let root_owned = root.to_path_buf();
        let dir_rules = rules.clone();
        walker.filter_entry(move |e| {
            if !e.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                return true;
            }
            match posix_relative(&root_owned, e.path()) {
                Some((_, comps)) => {
                    let refs: Vec<&str> = comps.iter().map(String::as_str).collect();
                    !dir_rules.excludes_dirs(&refs)
                }
                None => true,
            }
        });
    }

    let mut out = BTreeMap::new();
    for entry in walker.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("collect: walk error: {}", e);
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let Some((rel, comps)) = posix_relative(root, entry.path()) else {
            continue;
        };
        if comps.iter().any(|c| c.starts_with('.')) {
            continue;
        }
        let name = comps.last().map(String::as_str).unwrap_or("");
        if !masks.iter().any(|m| glob_match(m, name)) {
            continue;
        }
        if rules.is_ignored(&rel) {
            debug!("collect: ignored {}", rel);
            continue;
        }
        let bytes = match fs::read(entry.path()) {
            Ok(b) => b,
            Err(e) => {
                warn!("collect: skipping unreadable file {}: {}", entry.path().display(), e);
                continue;
            }
        };
        match String::from_utf8(bytes) {
            Ok(text) => {
                out.insert(rel, text);
            }
            Err(_) => warn!("collect: skipping non-UTF8 file: {}", entry.path().display()),
        }
    }
    Ok(out)
}
