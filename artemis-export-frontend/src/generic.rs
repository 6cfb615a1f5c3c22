//! Generic frontend: uuid-named `.art` tag files plus a `collection.json`
//! aggregate, for launchers without a dedicated import format.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use artemis_export_core::{GameEntry, HostConfig};
use serde::Serialize;

use crate::{
    EnrichmentResult, ExportError, ExportTarget, Exporter, WrittenFileSet, write_aggregate,
};

pub struct GenericExporter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Collection<'a> {
    host_name: &'a str,
    host_uuid: &'a str,
    apps: Vec<CollectionApp<'a>>,
}

#[derive(Serialize)]
struct CollectionApp<'a> {
    name: &'a str,
    uuid: &'a str,
}

impl Exporter for GenericExporter {
    fn target(&self) -> ExportTarget {
        ExportTarget::Generic
    }

    fn export(
        &self,
        host: &HostConfig,
        games: &[GameEntry],
        _enrichment: &HashMap<String, EnrichmentResult>,
        out_dir: &Path,
    ) -> Result<WrittenFileSet, ExportError> {
        fs::create_dir_all(out_dir)?;

        let mut set = WrittenFileSet::default();
        let mut exported: Vec<&GameEntry> = Vec::with_capacity(games.len());

        for game in games {
            let path = out_dir.join(format!("{}.art", game.uuid));
            match fs::write(&path, tag_file(host, game)) {
                Ok(()) => {
                    set.record(path);
                    exported.push(game);
                }
                Err(e) => set.record_failure(game, &e),
            }
        }

        let collection = Collection {
            host_name: &host.name,
            host_uuid: &host.uuid,
            apps: exported
                .iter()
                .map(|g| CollectionApp {
                    name: &g.name,
                    uuid: &g.uuid,
                })
                .collect(),
        };
        let rendered =
            serde_json::to_string_pretty(&collection).expect("collection serializes");

        let aggregate = out_dir.join("collection.json");
        write_aggregate(&aggregate, &rendered)?;
        set.record(aggregate);

        Ok(set)
    }
}

fn tag_file(host: &HostConfig, game: &GameEntry) -> String {
    format!(
        "# Artemis app entry\n\
         [host_uuid] {}\n\
         [host_name] {}\n\
         [app_uuid] {}\n\
         [app_name] {}\n",
        host.uuid, host.name, game.uuid, game.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_export_two_games() {
        let dir = tempfile::tempdir().unwrap();
        let games = vec![game("u1", "Halo"), game("u2", "Forza")];
        let set = GenericExporter
            .export(&host(), &games, &HashMap::new(), dir.path())
            .unwrap();

        assert!(set.failed.is_empty());
        assert!(dir.path().join("u1.art").exists());
        assert!(dir.path().join("u2.art").exists());

        let entry = fs::read_to_string(dir.path().join("u1.art")).unwrap();
        assert!(entry.contains("[host_uuid] h1"));
        assert!(entry.contains("[app_name] Halo"));

        let collection: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("collection.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(collection["hostName"], "PC1");
        assert_eq!(collection["hostUuid"], "h1");
        assert_eq!(collection["apps"][0]["uuid"], "u1");
        assert_eq!(collection["apps"][1]["name"], "Forza");
    }

    #[test]
    fn test_failed_game_omitted_from_collection() {
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on the tag file path makes the write fail.
        fs::create_dir(dir.path().join("u1.art")).unwrap();
        let games = vec![game("u1", "Halo"), game("u2", "Forza")];
        let set = GenericExporter
            .export(&host(), &games, &HashMap::new(), dir.path())
            .unwrap();

        assert_eq!(set.failed.len(), 1);
        assert_eq!(set.failed[0].name, "Halo");
        assert!(dir.path().join("u2.art").is_file());

        let collection: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("collection.json")).unwrap(),
        )
        .unwrap();
        let apps = collection["apps"].as_array().unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0]["uuid"], "u2");
    }

    #[test]
    fn test_collection_lists_all_apps_in_catalog_order() {
        let dir = tempfile::tempdir().unwrap();
        let games = vec![game("b", "Beta"), game("a", "Alpha")];
        GenericExporter
            .export(&host(), &games, &HashMap::new(), dir.path())
            .unwrap();

        let collection: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("collection.json")).unwrap(),
        )
        .unwrap();
        let apps = collection["apps"].as_array().unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0]["uuid"], "b");
        assert_eq!(apps[1]["uuid"], "a");
    }
}
