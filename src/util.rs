use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::{IoContext, Result};

/// Absolute, normalized form of `p` that also works for files that do not exist yet.
///
/// Existing paths are canonicalized. For a missing path the deepest existing
/// ancestor is canonicalized and the remaining components are appended.
pub fn resolve_path(p: &Path) -> PathBuf {
    if let Ok(c) = fs::canonicalize(p) {
        return c;
    }
    let abs = std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf());
    let abs = normalize(&abs);

    let mut tail = Vec::new();
    let mut cur = abs.as_path();
    while let Some(parent) = cur.parent() {
        if let Some(name) = cur.file_name() {
            tail.push(name.to_os_string());
        }
        if let Ok(base) = fs::canonicalize(parent) {
            let mut out = base;
            for part in tail.iter().rev() {
                out.push(part);
            }
            return out;
        }
        cur = parent;
    }
    abs
}

/// Lexical `.`/`..` folding (no filesystem access).
fn normalize(p: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in p.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Base name as UTF-8 (lossy); empty string for paths without one.
pub fn base_name(p: &Path) -> String {
    p.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read a file if it is there. NotFound → Ok(None); other errors propagate.
pub fn read_if_exists(p: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(p) {
        Ok(b) => Ok(Some(b)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(crate::Error::io("read", p, e)),
    }
}

/// `p` as is when absolute, otherwise joined onto `root`.
pub fn join_root(root: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

/// Hidden temp sibling used by `write_atomic`: `<dir>/.<name>.tmp`.
pub fn tmp_sibling(path: &Path) -> PathBuf {
    let name = base_name(path);
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write `bytes` to the hidden temp sibling and rename over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_sibling(path);
    {
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .io_context("open tmp", &tmp)?;
        f.write_all(bytes).io_context("write", &tmp)?;
        let _ = f.sync_all();
    }
    fs::rename(&tmp, path).io_context("rename tmp", path)?;
    Ok(())
}

/// Create parent directories of `path` as needed.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).io_context("create parent dir", parent)?;
        }
    }
    Ok(())
}
