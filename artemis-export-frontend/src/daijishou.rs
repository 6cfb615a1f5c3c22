//! Daijishō frontend: name-keyed `.art` launcher files plus the
//! `Artemis.json` platform + player descriptor Daijishō imports.
//!
//! The `.art` format has no metadata schema; enrichment for this target
//! contributes media files only.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use artemis_export_core::{GameEntry, HostConfig, sanitize_name};
use serde_json::json;

use crate::{
    ARTEMIS_ACTIVITY, EnrichmentResult, ExportError, ExportTarget, Exporter, WrittenFileSet,
    write_aggregate,
};

pub struct DaijishouExporter;

impl Exporter for DaijishouExporter {
    fn target(&self) -> ExportTarget {
        ExportTarget::Daijishou
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

        for game in games {
            let path = out_dir.join(format!("{}.art", sanitize_name(&game.name)));
            match fs::write(&path, launcher_entry(host, game)) {
                Ok(()) => set.record(path),
                Err(e) => set.record_failure(game, &e),
            }
        }

        let aggregate = out_dir.join("Artemis.json");
        let payload = platform_descriptor(host);
        let rendered = serde_json::to_string_pretty(&payload)
            .expect("platform descriptor is valid JSON");
        write_aggregate(&aggregate, &rendered)?;
        set.record(aggregate);

        Ok(set)
    }
}

fn launcher_entry(host: &HostConfig, game: &GameEntry) -> String {
    format!(
        "# Daijishou Player Template\n\
         [host_uuid] {}\n\
         [host_name] {}\n\
         [app_uuid] {}\n\
         [app_name] {}\n",
        host.uuid, host.name, game.uuid, game.name
    )
}

/// The platform + player import payload. The `{tags.*}` placeholders are
/// resolved by Daijishō from each `.art` file's tag lines at launch time.
fn platform_descriptor(host: &HostConfig) -> serde_json::Value {
    json!({
        "databaseVersion": 14,
        "revisionNumber": 2,
        "platform": {
            "name": host.name,
            "uniqueId": host.uuid,
            "shortname": "artemis",
            "acceptedFilenameRegex": r"^(?!(?:\._|\.).*).*$",
            "screenAspectRatioId": 1,
            "boxArtAspectRatioId": 0,
            "extra": "",
        },
        "playerList": [
            {
                "name": "artemis",
                "uniqueId": "com.limelight.noir",
                "description": "Supported extensions: art",
                "acceptedFilenameRegex": r"^(.*)\.(?:art)$",
                "amStartArguments": format!(
                    "-n {ARTEMIS_ACTIVITY}\n --es UUID {{tags.host_uuid}}\n --es AppUUID {{tags.app_uuid}}\n --es AppName \"{{tags.app_name}}\""
                ),
                "killPackageProcesses": true,
                "killPackageProcessesWarning": true,
                "extra": "",
            }
        ],
    })
}
