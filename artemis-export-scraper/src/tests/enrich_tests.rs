use super::*;

#[test]
fn test_expected_kinds_by_enabled_providers() {
    assert!(expected_kinds(false, false).is_empty());
    assert_eq!(
        expected_kinds(true, false),
        AssetKind::steamgriddb_kinds().to_vec()
    );
    assert_eq!(expected_kinds(false, true), AssetKind::igdb_kinds().to_vec());
    assert_eq!(expected_kinds(true, true).len(), 7);
}

#[test]
fn test_existing_assets_scan() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("grid.png"), b"png").unwrap();
    std::fs::write(dir.path().join("screenshot.jpg"), b"jpg").unwrap();

    let kinds = expected_kinds(true, true);
    let existing = existing_assets(dir.path(), &kinds);

    assert_eq!(existing.len(), 2);
    assert!(existing.contains_key(&AssetKind::Grid));
    assert!(existing.contains_key(&AssetKind::Screenshot));
    assert!(!existing.contains_key(&AssetKind::Logo));
}

#[test]
fn test_skip_policy_requires_all_expected_files() {
    let dir = tempfile::tempdir().unwrap();
    let kinds = expected_kinds(true, false);

    for kind in &kinds {
        std::fs::write(dir.path().join(kind.file_name()), b"x").unwrap();
    }
    let existing = existing_assets(dir.path(), &kinds);
    assert!(kinds.iter().all(|k| existing.contains_key(k)));

    std::fs::remove_file(dir.path().join(AssetKind::Tile.file_name())).unwrap();
    let existing = existing_assets(dir.path(), &kinds);
    assert!(!kinds.iter().all(|k| existing.contains_key(k)));
}

#[test]
fn test_copy_local_icon() {
    let dir = tempfile::tempdir().unwrap();
    let icon = dir.path().join("icon.png");
    std::fs::write(&icon, b"png bytes").unwrap();
    let media_dir = dir.path().join("media");
    std::fs::create_dir_all(&media_dir).unwrap();

    let job = EnrichJob {
        uuid: "u1".to_string(),
        name: "Halo".to_string(),
        image_path: Some(icon),
        media_dir: media_dir.clone(),
    };
    let mut result = EnrichmentResult::default();
    copy_local_icon(&job, &mut result);

    let dest = media_dir.join("boxFront.png");
    assert!(dest.exists());
    assert_eq!(result.assets.get(&AssetKind::BoxFront), Some(&dest));
    assert!(result.has_cover());
}

#[tokio::test]
async fn test_cancelled_games_count_as_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let jobs = vec![
        EnrichJob {
            uuid: "u1".to_string(),
            name: "Halo".to_string(),
            image_path: None,
            media_dir: dir.path().join("u1"),
        },
        EnrichJob {
            uuid: "u2".to_string(),
            name: "Forza".to_string(),
            image_path: None,
            media_dir: dir.path().join("u2"),
        },
    ];
    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = Arc::new(AtomicBool::new(true));

    let outcome = enrich_catalog(None, None, jobs, &EnrichOptions::default(), tx, cancel).await;

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.log.summary().skipped, 2);

    let mut skipped_events = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, EnrichEvent::Skipped { .. }) {
            skipped_events += 1;
        }
    }
    assert_eq!(skipped_events, 2);
}

#[test]
fn test_copy_local_icon_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let job = EnrichJob {
        uuid: "u1".to_string(),
        name: "Halo".to_string(),
        image_path: Some(dir.path().join("nope.png")),
        media_dir: dir.path().to_path_buf(),
    };
    let mut result = EnrichmentResult::default();
    copy_local_icon(&job, &mut result);
    assert!(result.is_empty());
}
