// tests/apply_updates.rs
//
// Покрываем:
// 1) Сценарий: main.py "A" → apply "B" → батч 001 с "A", restore() возвращает "A".
// 2) Повторный apply того же содержимого → no-op, новых батчей нет.
// 3) Создание нового файла агентом: плейсхолдер в батче, родительские каталоги.
// 4) Пустой набор правок → InvalidInput; повторяющийся путь → последняя правка.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use aye::{AyeConfig, ChangeApplier, Edit, Error};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("ayetest-apply-{prefix}-{pid}-{t}-{id}"))
}

fn applier(prefix: &str) -> Result<(PathBuf, ChangeApplier)> {
    let root = unique_root(prefix);
    fs::create_dir_all(&root)?;
    let cfg = AyeConfig::default().with_project_root(&root).build();
    Ok((root, ChangeApplier::from_config(&cfg)?))
}

#[test]
fn apply_then_undo() -> Result<()> {
    let (root, ap) = applier("undo")?;
    let main = root.join("main.py");
    fs::write(&main, "A")?;

    let edits: Vec<Edit> =
        serde_json::from_str(r#"[{"file_name":"main.py","file_content":"B"}]"#)?;
    let out = ap.apply_updates(&edits)?;

    let id = out.batch.clone().expect("batch expected");
    assert_eq!(id.ordinal, 1);
    assert!(out.batch_id().starts_with("001_"));
    assert_eq!(fs::read_to_string(&main)?, "B");
    let store = ap.store();
    assert_eq!(fs::read_to_string(store.batch_dir(&id).join("main.py"))?, "A");
    assert!(store.root().starts_with(&root.canonicalize()?));

    store.restore(None, None)?;
    assert_eq!(fs::read_to_string(&main)?, "A");
    Ok(())
}

#[test]
fn same_content_twice_is_noop() -> Result<()> {
    let (root, ap) = applier("twice")?;
    fs::write(root.join("main.py"), "A")?;

    let edits = vec![Edit::new("main.py", "B")];
    let first = ap.apply_updates(&edits)?;
    assert!(first.batch.is_some());

    let second = ap.apply_updates(&edits)?;
    assert!(second.is_noop());
    assert_eq!(second.batch_id(), "");
    assert_eq!(second.unchanged.len(), 1);
    assert_eq!(ap.store().batch_ids()?.len(), 1, "no new batch directory");
    Ok(())
}

#[test]
fn created_file_is_undoable() -> Result<()> {
    let (root, ap) = applier("create")?;
    let out = ap.apply_updates(&[Edit::new("pkg/sub/new.py", "print(1)\n")])?;
    let id = out.batch.unwrap();

    let created = root.join("pkg/sub/new.py");
    assert_eq!(fs::read_to_string(&created)?, "print(1)\n");
    let placeholder = ap.store().batch_dir(&id).join("new.py");
    assert_eq!(fs::read(&placeholder)?.len(), 0);

    ap.store().restore(None, Some("new.py"))?;
    assert_eq!(fs::read_to_string(&created)?, "");
    Ok(())
}

#[test]
fn mixed_changed_and_unchanged() -> Result<()> {
    let (root, ap) = applier("mixed")?;
    fs::write(root.join("a.py"), "same")?;
    fs::write(root.join("b.py"), "old")?;

    let out = ap.apply_updates(&[Edit::new("a.py", "same"), Edit::new("b.py", "new")])?;
    assert_eq!(out.written.len(), 1);
    assert_eq!(out.unchanged.len(), 1);
    let id = out.batch.unwrap();
    let meta = ap.store().metadata(&id)?;
    assert_eq!(meta.file_names(), vec!["b.py".to_string()], "only changed files captured");
    Ok(())
}

#[test]
fn empty_and_blank_edits_are_invalid() -> Result<()> {
    let (_root, ap) = applier("invalid")?;
    assert!(matches!(ap.apply_updates(&[]), Err(Error::InvalidInput(_))));
    assert!(matches!(
        ap.apply_updates(&[Edit::new("  ", "x")]),
        Err(Error::InvalidInput(_))
    ));
    assert!(ap.store().batch_ids()?.is_empty());
    Ok(())
}

#[test]
fn repeated_path_last_edit_wins() -> Result<()> {
    let (root, ap) = applier("repeat")?;
    fs::write(root.join("m.py"), "orig")?;
    let out = ap.apply_updates(&[Edit::new("m.py", "first"), Edit::new("m.py", "second")])?;
    assert_eq!(out.written.len(), 1);
    assert_eq!(fs::read_to_string(root.join("m.py"))?, "second");
    let id = out.batch.unwrap();
    assert_eq!(fs::read_to_string(ap.store().batch_dir(&id).join("m.py"))?, "orig");
    Ok(())
}

#[test]
fn write_after_restore_relies_on_existing_batch() -> Result<()> {
    let (root, ap) = applier("restored")?;
    let f = root.join("main.py");
    fs::write(&f, "A")?;
    ap.apply_updates(&[Edit::new("main.py", "B")])?;
    ap.store().restore(None, None)?;
    assert_eq!(fs::read_to_string(&f)?, "A");

    // "A" already sits in batch 001 → no new batch, write still happens
    let out = ap.apply_updates(&[Edit::new("main.py", "C")])?;
    assert!(out.batch.is_none());
    assert_eq!(out.written.len(), 1);
    assert_eq!(fs::read_to_string(&f)?, "C");
    ap.store().restore(None, None)?;
    assert_eq!(fs::read_to_string(&f)?, "A");
    Ok(())
}
