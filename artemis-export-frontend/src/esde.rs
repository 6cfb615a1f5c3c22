//! ES-DE frontend: name-keyed `.artes` files whose content is the app
//! uuid, a host uuid file, the system/emulator association XML pair, and a
//! `gamelist.xml` carrying enrichment metadata.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use artemis_export_core::{GameEntry, HostConfig, sanitize_name};

use crate::{
    ARTEMIS_ACTIVITY, AssetKind, EnrichmentResult, ExportError, ExportTarget, Exporter,
    WrittenFileSet, media_ref, write_aggregate,
};

pub struct EsDeExporter;

impl Exporter for EsDeExporter {
    fn target(&self) -> ExportTarget {
        ExportTarget::Esde
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
            let path = out_dir.join(format!("{}.artes", sanitize_name(&game.name)));
            match fs::write(&path, &game.uuid) {
                Ok(()) => {
                    set.record(path);
                    exported.push(game);
                }
                Err(e) => set.record_failure(game, &e),
            }
        }

        // ES-DE injects the host uuid into the launch command from this file.
        let uuid_file = out_dir.join("Apollo.uuid");
        write_aggregate(&uuid_file, &host.uuid)?;
        set.record(uuid_file);

        let systems = out_dir.join("es_systems.xml");
        write_aggregate(&systems, &systems_xml(host))?;
        set.record(systems);

        let find_rules = out_dir.join("es_find_rules.xml");
        write_aggregate(&find_rules, &find_rules_xml())?;
        set.record(find_rules);

        let gamelist = out_dir.join("gamelist.xml");
        write_aggregate(&gamelist, &gamelist_xml(&exported, enrichment))?;
        set.record(gamelist);

        Ok(set)
    }
}

fn systems_xml(host: &HostConfig) -> String {
    format!(
        r#"<systemList>
  <system>
    <name>artemis</name>
    <fullname>{}</fullname>
    <path>%ROMPATH%/artemis</path>
    <extension>.artes</extension>
    <command label="Artemis">%EMULATOR_Artemis% %EXTRA_UUID%=%INJECT%=Apollo.uuid %EXTRA_AppUUID%=%INJECT%=%BASENAME%.artes</command>
    <platform>artemis</platform>
    <theme>artemis</theme>
  </system>
</systemList>"#,
        escape_xml(&host.name)
    )
}

fn find_rules_xml() -> String {
    format!(
        r#"<ruleList>
  <emulator name="Artemis">
    <rule type="androidpackage">
      <entry>{ARTEMIS_ACTIVITY}</entry>
    </rule>
  </emulator>
</ruleList>"#
    )
}

fn gamelist_xml(
    games: &[&GameEntry],
    enrichment: &HashMap<String, EnrichmentResult>,
) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\"?>\n");
    xml.push_str("<gameList>\n");
    xml.push_str("  <provider>\n");
    xml.push_str("    <System>artemis</System>\n");
    xml.push_str("    <software>artemis-export</software>\n");
    xml.push_str("    <database>IGDB.com / SteamGridDB.com</database>\n");
    xml.push_str("  </provider>\n");

    for game in games {
        let key = sanitize_name(&game.name);
        xml.push_str("  <game>\n");
        write_tag(&mut xml, "path", &format!("./{key}.artes"));
        write_tag(&mut xml, "name", &game.name);

        if let Some(result) = enrichment.get(&game.uuid) {
            if let Some(ref meta) = result.metadata {
                if let Some(ref summary) = meta.summary {
                    write_tag(&mut xml, "desc", summary);
                }
                if let Some(rating) = meta.rating {
                    write_tag(&mut xml, "rating", &format!("{:.2}", f32::from(rating) / 100.0));
                }
                if let Some(ref date) = meta.release_date {
                    write_tag(&mut xml, "releasedate", &format_esde_date(date));
                }
                if !meta.developers.is_empty() {
                    write_tag(&mut xml, "developer", &meta.developers.join(", "));
                }
                if !meta.publishers.is_empty() {
                    write_tag(&mut xml, "publisher", &meta.publishers.join(", "));
                }
                if !meta.genres.is_empty() {
                    write_tag(&mut xml, "genre", &meta.genres.join(", "));
                }
            }

            // Grid first, then box front — first provider queried wins.
            let image = [AssetKind::Grid, AssetKind::BoxFront]
                .iter()
                .find(|kind| result.assets.contains_key(kind))
                .map(|kind| media_ref(&key, *kind));
            if let Some(image) = image {
                write_tag(&mut xml, "image", &image);
                write_tag(&mut xml, "thumbnail", &image);
            }
            if result.assets.contains_key(&AssetKind::Marquee) {
                write_tag(&mut xml, "marquee", &media_ref(&key, AssetKind::Marquee));
            }
            if result.assets.contains_key(&AssetKind::Screenshot) {
                write_tag(&mut xml, "screenshot", &media_ref(&key, AssetKind::Screenshot));
            }
        }

        xml.push_str("  </game>\n");
    }

    xml.push_str("</gameList>\n");
    xml
}

fn write_tag(xml: &mut String, tag: &str, value: &str) {
    xml.push_str("    <");
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(&escape_xml(value));
    xml.push_str("</");
    xml.push_str(tag);
    xml.push_str(">\n");
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Convert `YYYY-MM-DD` (or bare `YYYYMMDD`) to ES-DE's `YYYYMMDDTHHMMSS`.
fn format_esde_date(date: &str) -> String {
    let cleaned = date.replace('-', "");
    if cleaned.len() >= 8 {
        format!("{}T000000", &cleaned[..8])
    } else {
        format!("{cleaned}T000000")
    }
}

#[cfg(test)]
#[path = "tests/esde_tests.rs"]
mod tests;
