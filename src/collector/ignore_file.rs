//! Ignore rules loaded from `<root>/.ayeignore`.
//!
//! Format: one pattern per line; blank lines and lines starting with `#` are
//! skipped. `name/` excludes every path that has a directory component
//! `name` (at any depth). Anything else is a glob tested against both the
//! base name and the full relative path.

use std::path::Path;

use crate::error::Result;
use crate::util::read_if_exists;

use super::glob::glob_match;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    /// Directory patterns, trailing `/` stripped, split into components.
    dirs: Vec<Vec<String>>,
    globs: Vec<String>,
}

impl IgnoreRules {
    /// Load rules from `path`. A missing file yields empty rules.
    pub fn load(path: &Path) -> Result<Self> {
        match read_if_exists(path)? {
            Some(bytes) => Ok(Self::parse(&String::from_utf8_lossy(&bytes))),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut rules = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(dir) = line.strip_suffix('/') {
                let parts: Vec<String> = dir
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                if !parts.is_empty() {
                    rules.dirs.push(parts);
                }
            } else {
                rules.globs.push(line.to_string());
            }
        }
        rules
    }

    /// Does a directory pattern hit one of `dir_components` (the directory part
    /// of a relative path)?
    pub fn excludes_dirs(&self, dir_components: &[&str]) -> bool {
        self.dirs.iter().any(|pat| {
            dir_components
                .windows(pat.len())
                .any(|w| w.iter().zip(pat).all(|(a, b)| *a == b.as_str()))
        })
    }

    /// Is the file at POSIX relative path `rel` ignored?
    pub fn is_ignored(&self, rel: &str) -> bool {
        let comps: Vec<&str> = rel.split('/').filter(|s| !s.is_empty()).collect();
        let Some((name, dirs)) = comps.split_last() else {
            return false;
        };
        if self.excludes_dirs(dirs) {
            return true;
        }
        self.globs
            .iter()
            .any(|g| glob_match(g, name) || glob_match(g, rel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_blanks() {
        let r = IgnoreRules::parse("# header\n\n  \nsecrets.py\nbuild/\n");
        assert!(r.is_ignored("secrets.py"));
        assert!(r.is_ignored("pkg/secrets.py"));
        assert!(!r.is_ignored("main.py"));
    }

    #[test]
    fn dir_pattern_any_depth() {
        let r = IgnoreRules::parse("build/\n");
        assert!(r.is_ignored("build/out.py"));
        assert!(r.is_ignored("a/b/build/c/out.py"));
        assert!(!r.is_ignored("builder/out.py"));
        // a file literally named `build` is not a directory hit
        assert!(!r.is_ignored("src/build"));
    }

    #[test]
    fn glob_against_relative_path() {
        let r = IgnoreRules::parse("tests/*.py\n");
        assert!(r.is_ignored("tests/test_a.py"));
        assert!(!r.is_ignored("src/a.py"));
    }

    #[test]
    fn nested_dir_pattern() {
        let r = IgnoreRules::parse("gen/proto/\n");
        assert!(r.is_ignored("x/gen/proto/a.py"));
        assert!(!r.is_ignored("gen/a.py"));
    }
}
