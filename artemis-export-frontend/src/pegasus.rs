//! Pegasus frontend: uuid-named `.artp` launcher files plus a
//! `metadata.pegasus.txt` collection listing. Pegasus discovers artwork on
//! its own under `media/<basename>/`, so media needs no explicit references.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use artemis_export_core::{GameEntry, HostConfig};

use crate::{
    ARTEMIS_ACTIVITY, EnrichmentResult, ExportError, ExportTarget, Exporter, GameMetadata,
    WrittenFileSet, write_aggregate,
};

pub struct PegasusExporter;

impl Exporter for PegasusExporter {
    fn target(&self) -> ExportTarget {
        ExportTarget::Pegasus
    }

    fn export(
        &self,
        host: &HostConfig,
        games: &[GameEntry],
        enrichment: &HashMap<String, EnrichmentResult>,
        out_dir: &Path,
    ) -> Result<WrittenFileSet, ExportError> {
        fs::create_dir_all(out_dir)?;

        let mut set = WrittenFileSet::default();
        let mut exported: Vec<&GameEntry> = Vec::with_capacity(games.len());

        for game in games {
            let path = out_dir.join(format!("{}.artp", game.uuid));
            let contents = format!(
                "[metadata]\napp_name={}\napp_uuid={}\nhost_uuid={}\n",
                game.name, game.uuid, host.uuid
            );
            match fs::write(&path, contents) {
                Ok(()) => {
                    set.record(path);
                    exported.push(game);
                }
                Err(e) => set.record_failure(game, &e),
            }
        }

        let aggregate = out_dir.join("metadata.pegasus.txt");
        write_aggregate(&aggregate, &collection_listing(host, &exported, enrichment))?;
        set.record(aggregate);

        Ok(set)
    }
}

/// Render the full `metadata.pegasus.txt` content.
fn collection_listing(
    host: &HostConfig,
    games: &[&GameEntry],
    enrichment: &HashMap<String, EnrichmentResult>,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("collection: {}", host.name));
    lines.push("shortname: artemis".to_string());
    lines.push("extension: artp".to_string());
    lines.push(format!(
        "launch: am start -n {} --es UUID {} --es AppUUID {{file.basename}}",
        ARTEMIS_ACTIVITY, host.uuid
    ));
    lines.push(String::new());

    for game in games {
        lines.push(format!("game: {}", game.name));
        lines.push(format!("file: {}.artp", game.uuid));

        if let Some(meta) = enrichment.get(&game.uuid).and_then(|e| e.metadata.as_ref()) {
            push_metadata_fields(&mut lines, meta);
        }
        lines.push(String::new());
    }

    let mut out = lines.join("\n");
    while out.ends_with('\n') {
        out.pop();
    }
    out.push('\n');
    out
}

fn push_metadata_fields(lines: &mut Vec<String>, meta: &GameMetadata) {
    if let Some(ref summary) = meta.summary {
        push_field(lines, "summary", summary);
    }
    if let Some(ref description) = meta.description {
        push_field(lines, "description", description);
    }
    if !meta.developers.is_empty() {
        push_field(lines, "developer", &meta.developers.join(", "));
    }
    if !meta.publishers.is_empty() {
        push_field(lines, "publisher", &meta.publishers.join(", "));
    }
    if !meta.genres.is_empty() {
        push_field(lines, "genre", &meta.genres.join(", "));
    }
    if let Some(rating) = meta.rating {
        push_field(lines, "rating", &format!("{rating}%"));
    }
    if let Some(ref release) = meta.release_date {
        push_field(lines, "release", release);
    }
    if !meta.tags.is_empty() {
        push_field(lines, "tags", &meta.tags.join(", "));
    }
}

/// Emit one `key: value` field. Multi-line values continue on
/// two-space-indented lines, which is how Pegasus marks continuations.
fn push_field(lines: &mut Vec<String>, key: &str, value: &str) {
    let mut parts = value
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty());
    let Some(first) = parts.next() else {
        return;
    };
    lines.push(format!("{key}: {first}"));
    for cont in parts {
        lines.push(format!("  {cont}"));
    }
}

#[cfg(test)]
#[path = "tests/pegasus_tests.rs"]
mod tests;
