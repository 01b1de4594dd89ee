// tests/randomized_sequence.rs
//
// Детерминированный (seeded) прогон случайных apply/restore:
// - ordinals успешных батчей растут строго на 1 без пропусков;
// - каждый захваченный блоб совпадает с содержимым файла до записи;
// - restore последнего батча возвращает ровно те байты, что были до apply.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use oorandom::Rand32;

use aye::{AyeConfig, ChangeApplier, Edit};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("ayetest-rand-{prefix}-{pid}-{t}-{id}"))
}

const FILES: [&str; 4] = ["a.py", "b.py", "pkg/c.py", "pkg/deeper/d.txt"];

#[test]
fn random_apply_sequence_keeps_invariants() -> Result<()> {
    let root = unique_root("seq");
    fs::create_dir_all(&root)?;
    let cfg = AyeConfig::default().with_project_root(&root).build();
    let ap = ChangeApplier::from_config(&cfg)?;

    let mut rng = Rand32::new(0x5eed_a7e5);
    let mut last_ordinal = 0u64;

    for _step in 0..40 {
        // 1..=3 edits, small alphabet so no-ops and repeats happen
        let n = rng.rand_range(1..4) as usize;
        let mut edits = Vec::with_capacity(n);
        for _ in 0..n {
            let f = FILES[rng.rand_range(0..FILES.len() as u32) as usize];
            let v = rng.rand_range(0..4);
            edits.push(Edit::new(f, format!("{f} v{v}\n")));
        }

        // pre-edit state of every target (None = absent)
        let before: HashMap<PathBuf, Option<Vec<u8>>> = edits
            .iter()
            .map(|e| {
                let p = root.join(&e.path);
                (p.clone(), fs::read(&p).ok())
            })
            .collect();

        let out = ap.apply_updates(&edits)?;

        // final content = last edit per path
        for e in &edits {
            let last = edits.iter().rev().find(|x| x.path == e.path).unwrap();
            assert_eq!(fs::read_to_string(root.join(&e.path))?, last.content);
        }

        let Some(id) = out.batch.clone() else { continue };
        assert_eq!(id.ordinal, last_ordinal + 1, "ordinal gap/repeat at {}", id);
        last_ordinal = id.ordinal;

        let meta = ap.store().metadata(&id)?;
        assert!(!meta.files.is_empty());
        for rec in &meta.files {
            let key = before
                .keys()
                .find(|k| k.canonicalize().ok().as_ref() == Some(&rec.original_path))
                .cloned()
                .expect("captured path must be one of the edit targets");
            let expected = before[&key].clone().unwrap_or_default();
            assert_eq!(fs::read(&rec.snapshot_path)?, expected);
        }

        // every few steps: undo and check exact bytes, then re-apply nothing
        if id.ordinal % 5 == 0 {
            let report = ap.store().restore(Some(&id.to_string()), None)?;
            assert!(report.is_complete());
            for rec in &meta.files {
                assert_eq!(fs::read(&rec.original_path)?, fs::read(&rec.snapshot_path)?);
            }
        }
    }

    assert!(last_ordinal > 0, "sequence must produce batches");
    let ids = ap.store().batch_ids()?;
    let ords: Vec<u64> = ids.iter().map(|i| i.ordinal).collect();
    let expected: Vec<u64> = (1..=last_ordinal).collect();
    assert_eq!(ords, expected);
    Ok(())
}
