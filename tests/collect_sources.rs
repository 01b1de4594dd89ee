// tests/collect_sources.rs
//
// Покрываем:
// 1) .ayeignore: `secrets.py` исключается, хотя подходит под маску.
// 2) Скрытые компоненты пути (`.git/`, `.env.py`) не попадают никогда.
// 3) `build/` режет каталоги build на любой глубине.
// 4) Нерекурсивный режим, маска через запятую, не-UTF-8 файлы, корень-не-каталог.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use aye::{collect_sources, CollectOptions, Error};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("ayetest-collect-{prefix}-{pid}-{t}-{id}"))
}

fn put(root: &Path, rel: &str, body: &str) -> Result<()> {
    let p = root.join(rel);
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(p, body)?;
    Ok(())
}

#[test]
fn ignore_file_excludes_matching_names() -> Result<()> {
    let root = unique_root("ignore");
    put(&root, "main.py", "print('main')")?;
    put(&root, "secrets.py", "TOKEN = 'x'")?;
    put(&root, "pkg/secrets.py", "TOKEN = 'y'")?;
    put(&root, ".ayeignore", "# local\nsecrets.py\n")?;

    let got = collect_sources(&CollectOptions::new(&root, "*.py"))?;
    let keys: Vec<&str> = got.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["main.py"]);
    assert_eq!(got["main.py"], "print('main')");
    Ok(())
}

#[test]
fn hidden_components_never_collected() -> Result<()> {
    let root = unique_root("hidden");
    put(&root, "a.py", "a")?;
    put(&root, ".env.py", "hidden file")?;
    put(&root, ".git/hooks/x.py", "hidden dir")?;
    put(&root, "pkg/.cache/y.py", "nested hidden dir")?;
    put(&root, "pkg/z.py", "z")?;
    // ignore file trying to re-include does not matter
    put(&root, ".ayeignore", "\n# nothing\n")?;

    let got = collect_sources(&CollectOptions::new(&root, "*.py"))?;
    let keys: Vec<&str> = got.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a.py", "pkg/z.py"]);
    assert!(got.keys().all(|k| k.split('/').all(|c| !c.starts_with('.'))));
    Ok(())
}

#[test]
fn dir_pattern_any_depth() -> Result<()> {
    let root = unique_root("builddir");
    put(&root, "src/app.py", "app")?;
    put(&root, "build/gen.py", "gen")?;
    put(&root, "src/deep/build/out.py", "out")?;
    put(&root, "src/builder.py", "not a dir")?;
    put(&root, ".ayeignore", "build/\n")?;

    let got = collect_sources(&CollectOptions::new(&root, "*.py"))?;
    let keys: Vec<&str> = got.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["src/app.py", "src/builder.py"]);
    Ok(())
}

#[test]
fn non_recursive_and_multi_mask() -> Result<()> {
    let root = unique_root("flat");
    put(&root, "top.py", "1")?;
    put(&root, "top.rs", "2")?;
    put(&root, "notes.md", "3")?;
    put(&root, "sub/inner.py", "4")?;

    let flat = collect_sources(&CollectOptions::new(&root, "*.py, *.rs").recursive(false))?;
    let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["top.py", "top.rs"]);

    let deep = collect_sources(&CollectOptions::new(&root, "*.py"))?;
    assert!(deep.contains_key("sub/inner.py"));
    Ok(())
}

#[test]
fn non_utf8_is_skipped() -> Result<()> {
    let root = unique_root("utf8");
    put(&root, "ok.py", "fine")?;
    fs::write(root.join("bad.py"), [0xff, 0xfe, 0x00, 0x80])?;

    let got = collect_sources(&CollectOptions::new(&root, "*.py"))?;
    assert_eq!(got.len(), 1);
    assert!(got.contains_key("ok.py"));
    Ok(())
}

#[test]
fn root_must_be_directory() -> Result<()> {
    let root = unique_root("notdir");
    put(&root, "file.py", "x")?;
    let err = collect_sources(&CollectOptions::new(root.join("file.py"), "*.py")).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)), "{err}");
    let err = collect_sources(&CollectOptions::new(root.join("nope"), "*.py")).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)), "{err}");
    Ok(())
}
