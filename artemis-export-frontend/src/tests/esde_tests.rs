use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use super::*;
use crate::GameMetadata;

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
fn test_format_esde_date() {
    assert_eq!(format_esde_date("2001-11-15"), "20011115T000000");
    assert_eq!(format_esde_date("20011115"), "20011115T000000");
    assert_eq!(format_esde_date("2001"), "2001T000000");
}

#[test]
fn test_systems_xml_escapes_host_name() {
    let xml = systems_xml(&HostConfig {
        name: "Den & Office".to_string(),
        uuid: "h1".to_string(),
    });
    assert!(xml.contains("<fullname>Den &amp; Office</fullname>"));
    assert!(xml.contains("<extension>.artes</extension>"));
}

#[test]
fn test_gamelist_minimal_entry() {
    let games = [game("u1", "Halo: CE")];
    let refs: Vec<&GameEntry> = games.iter().collect();
    let xml = gamelist_xml(&refs, &HashMap::new());
    assert!(xml.contains("<path>./Halo -  CE.artes</path>"));
    assert!(xml.contains("<name>Halo: CE</name>"));
    assert!(!xml.contains("<desc>"));
    assert!(!xml.contains("<image>"));
}

#[test]
fn test_gamelist_enriched_entry() {
    let mut enrichment = HashMap::new();
    let mut assets = HashMap::new();
    assets.insert(AssetKind::Grid, PathBuf::from("grid.png"));
    assets.insert(AssetKind::BoxFront, PathBuf::from("boxFront.jpg"));
    assets.insert(AssetKind::Marquee, PathBuf::from("marquee.png"));
    enrichment.insert(
        "u1".to_string(),
        EnrichmentResult {
            assets,
            metadata: Some(GameMetadata {
                summary: Some("A shooter.".to_string()),
                rating: Some(87),
                release_date: Some("2001-11-15".to_string()),
                developers: vec!["Bungie".to_string()],
                genres: vec!["Shooter".to_string()],
                ..GameMetadata::default()
            }),
        },
    );

    let games = [game("u1", "Halo")];
    let refs: Vec<&GameEntry> = games.iter().collect();
    let xml = gamelist_xml(&refs, &enrichment);

    assert!(xml.contains("<desc>A shooter.</desc>"));
    assert!(xml.contains("<rating>0.87</rating>"));
    assert!(xml.contains("<releasedate>20011115T000000</releasedate>"));
    assert!(xml.contains("<developer>Bungie</developer>"));
    // Grid beats box front for the image slot.
    assert!(xml.contains("<image>./media/Halo/grid.png</image>"));
    assert!(xml.contains("<thumbnail>./media/Halo/grid.png</thumbnail>"));
    assert!(xml.contains("<marquee>./media/Halo/marquee.png</marquee>"));
}

#[test]
fn test_export_writes_full_tree() {
    let dir = tempfile::tempdir().unwrap();
    let games = vec![game("u1", "Halo")];
    let set = EsDeExporter
        .export(&host(), &games, &HashMap::new(), dir.path())
        .unwrap();

    assert!(set.failed.is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("Halo.artes")).unwrap(),
        "u1"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("Apollo.uuid")).unwrap(),
        "h1"
    );
    assert!(dir.path().join("es_systems.xml").exists());
    assert!(dir.path().join("es_find_rules.xml").exists());
    assert!(dir.path().join("gamelist.xml").exists());
}
