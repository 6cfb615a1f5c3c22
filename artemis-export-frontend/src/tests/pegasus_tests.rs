use std::collections::HashMap;
use std::fs;

use super::*;
use crate::EnrichmentResult;

fn host() -> HostConfig {
    HostConfig {
        name: "PC1".to_string(),
        uuid: "h1".to_string(),
    }
}

fn game(uuid: &str, name: &str) -> GameEntry {
    GameEntry {
        uuid: uuid.to_string(),
        name: name.to_string(),
        image_path: None,
    }
}

#[test]
fn test_listing_minimal_without_enrichment() {
    let games = [game("u1", "Halo"), game("u2", "Forza")];
    let refs: Vec<&GameEntry> = games.iter().collect();
    let listing = collection_listing(&host(), &refs, &HashMap::new());

    let expected = "collection: PC1\n\
                    shortname: artemis\n\
                    extension: artp\n\
                    launch: am start -n com.limelight.noir/com.limelight.ShortcutTrampoline --es UUID h1 --es AppUUID {file.basename}\n\
                    \n\
                    game: Halo\n\
                    file: u1.artp\n\
                    \n\
                    game: Forza\n\
                    file: u2.artp\n";
    assert_eq!(listing, expected);
}

#[test]
fn test_listing_metadata_field_order() {
    let mut enrichment = HashMap::new();
    enrichment.insert(
        "u1".to_string(),
        EnrichmentResult {
            assets: HashMap::new(),
            metadata: Some(GameMetadata {
                summary: Some("Short pitch.".to_string()),
                description: Some("Long story.".to_string()),
                rating: Some(87),
                genres: vec!["Shooter".to_string(), "Adventure".to_string()],
                release_date: Some("2001-11-15".to_string()),
                developers: vec!["Bungie".to_string()],
                publishers: vec!["Microsoft".to_string()],
                tags: vec!["Single player".to_string()],
            }),
        },
    );
    let games = [game("u1", "Halo")];
    let refs: Vec<&GameEntry> = games.iter().collect();
    let listing = collection_listing(&host(), &refs, &enrichment);

    let body: Vec<&str> = listing.lines().skip(5).collect();
    assert_eq!(
        body,
        vec![
            "game: Halo",
            "file: u1.artp",
            "summary: Short pitch.",
            "description: Long story.",
            "developer: Bungie",
            "publisher: Microsoft",
            "genre: Shooter, Adventure",
            "rating: 87%",
            "release: 2001-11-15",
            "tags: Single player",
        ]
    );
}

#[test]
fn test_push_field_multiline_continuation() {
    let mut lines = Vec::new();
    push_field(&mut lines, "description", "First paragraph.\n\nSecond paragraph.");
    assert_eq!(
        lines,
        vec!["description: First paragraph.", "  Second paragraph."]
    );
}

#[test]
fn test_push_field_skips_blank_value() {
    let mut lines = Vec::new();
    push_field(&mut lines, "summary", "  \n ");
    assert!(lines.is_empty());
}

#[test]
fn test_export_writes_uuid_keyed_files_and_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let games = vec![game("u1", "Halo: CE")];
    let set = PegasusExporter
        .export(&host(), &games, &HashMap::new(), dir.path())
        .unwrap();

    assert!(set.failed.is_empty());
    let launcher = fs::read_to_string(dir.path().join("u1.artp")).unwrap();
    assert_eq!(
        launcher,
        "[metadata]\napp_name=Halo: CE\napp_uuid=u1\nhost_uuid=h1\n"
    );
    assert!(dir.path().join("metadata.pegasus.txt").exists());
}

#[test]
fn test_failed_game_omitted_from_listing() {
    let dir = tempfile::tempdir().unwrap();
    // A directory squatting on the launcher path makes the write fail.
    fs::create_dir(dir.path().join("u1.artp")).unwrap();
    let games = vec![game("u1", "Halo"), game("u2", "Forza")];
    let set = PegasusExporter
        .export(&host(), &games, &HashMap::new(), dir.path())
        .unwrap();

    assert_eq!(set.failed.len(), 1);
    assert_eq!(set.failed[0].name, "Halo");
    assert!(dir.path().join("u2.artp").is_file());

    let listing = fs::read_to_string(dir.path().join("metadata.pegasus.txt")).unwrap();
    assert!(!listing.contains("game: Halo"));
    assert!(listing.contains("game: Forza"));
}
