//! Centralized configuration for aye.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - The store root is an explicit value handed to SnapshotStore/ChangeApplier,
//!   never a process-wide constant, so tests can point it at a temp dir.
//!
//! Env overrides (all optional):
//! - AYE_ROOT          — project root (default ".")
//! - AYE_SNAPSHOT_DIR  — store root; absolute as is, relative to AYE_ROOT
//!                       (default <root>/.aye/snapshots)
//! - AYE_KEEP          — default retention for `keep` (default 10)
//! - AYE_FILE_MASK     — source mask for collection (default "*.py")
//! - AYE_RECURSIVE     — 0|1|true|false|on|off|yes|no (default true)
//! - AYE_IGNORE_FILE   — ignore file name under the root (default ".ayeignore")

use std::fmt;
use std::path::{Path, PathBuf};

use crate::util::join_root;

pub const DEFAULT_STORE_SUBDIR: &str = ".aye/snapshots";
pub const DEFAULT_KEEP: usize = 10;
pub const DEFAULT_FILE_MASK: &str = "*.py";
pub const DEFAULT_IGNORE_FILE: &str = ".ayeignore";

#[derive(Clone, Debug)]
pub struct AyeConfig {
    /// Project root: relative edit paths and source collection start here.
    pub project_root: PathBuf,

    /// Explicit store root. None => <project_root>/.aye/snapshots.
    pub store_dir: Option<PathBuf>,

    /// Number of batches `keep` retains when no count is given.
    pub keep_default: usize,

    /// Glob mask(s) for source collection, comma-separated.
    pub file_mask: String,

    /// Descend into subdirectories during collection.
    pub recursive: bool,

    /// Ignore file name, looked up at the project root.
    pub ignore_file: String,
}

impl Default for AyeConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            store_dir: None,
            keep_default: DEFAULT_KEEP,
            file_mask: DEFAULT_FILE_MASK.to_string(),
            recursive: true,
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
        }
    }
}

impl AyeConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("AYE_ROOT") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.project_root = PathBuf::from(s);
            }
        }

        if let Ok(v) = std::env::var("AYE_SNAPSHOT_DIR") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.store_dir = Some(PathBuf::from(s));
            }
        }

        if let Ok(v) = std::env::var("AYE_KEEP") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.keep_default = n;
            }
        }

        if let Ok(v) = std::env::var("AYE_FILE_MASK") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.file_mask = s.to_string();
            }
        }

        if let Ok(v) = std::env::var("AYE_RECURSIVE") {
            if let Some(b) = parse_flag(&v) {
                cfg.recursive = b;
            }
        }

        if let Ok(v) = std::env::var("AYE_IGNORE_FILE") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.ignore_file = s.to_string();
            }
        }

        cfg
    }

    /// Resolved store root.
    ///
    /// - store_dir None     → <project_root>/.aye/snapshots
    /// - store_dir absolute → as is
    /// - store_dir relative → <project_root>/<store_dir>
    pub fn store_root(&self) -> PathBuf {
        match &self.store_dir {
            None => self.project_root.join(DEFAULT_STORE_SUBDIR),
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.project_root.join(p),
        }
    }

    /// Resolve an edit/target path against the project root.
    pub fn resolve_path(&self, p: &Path) -> PathBuf {
        join_root(&self.project_root, p)
    }

    pub fn with_project_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.project_root = root.into();
        self
    }

    pub fn with_store_dir<P: Into<PathBuf>>(mut self, dir: Option<P>) -> Self {
        self.store_dir = dir.map(Into::into);
        self
    }

    pub fn with_keep_default(mut self, n: usize) -> Self {
        self.keep_default = n;
        self
    }

    pub fn with_file_mask<S: Into<String>>(mut self, mask: S) -> Self {
        self.file_mask = mask.into();
        self
    }

    pub fn with_recursive(mut self, on: bool) -> Self {
        self.recursive = on;
        self
    }

    pub fn with_ignore_file<S: Into<String>>(mut self, name: S) -> Self {
        self.ignore_file = name.into();
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for AyeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AyeConfig {{ \
             project_root: {}, \
             store_root: {}, \
             keep_default: {}, \
             file_mask: {}, \
             recursive: {}, \
             ignore_file: {} \
             }}",
            self.project_root.display(),
            self.store_root().display(),
            self.keep_default,
            self.file_mask,
            self.recursive,
            self.ignore_file,
        )
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
