//! Reads the streaming host's configuration: a `key = value` conf file
//! pointing at two sibling JSON documents (application catalog and runtime
//! state), producing the normalized [`Catalog`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::{Catalog, GameEntry, HostConfig};

const DEFAULT_APPS_FILE: &str = "apps.json";
const DEFAULT_STATE_FILE: &str = "sunshine_state.json";

/// apps.json: `{"apps": [{"name", "uuid", "image-path"?}, ...]}`.
#[derive(Debug, Deserialize)]
struct AppsFile {
    #[serde(default)]
    apps: Vec<AppRecord>,
}

#[derive(Debug, Deserialize)]
struct AppRecord {
    name: Option<String>,
    uuid: Option<String>,
    #[serde(rename = "image-path")]
    image_path: Option<String>,
}

/// Runtime state: `{"root": {"uniqueid": "..."}}`.
#[derive(Debug, Deserialize)]
struct StateFile {
    root: StateRoot,
}

#[derive(Debug, Deserialize)]
struct StateRoot {
    uniqueid: Option<String>,
}

/// Load the host configuration and both referenced JSON catalogs.
///
/// Referenced file paths resolve relative to the conf file's directory.
/// Any missing file or missing required field aborts with a [`ConfigError`];
/// configuration is local and deterministic, so there are no retries.
pub fn load_catalog(conf_path: &Path) -> Result<Catalog, ConfigError> {
    let raw = std::fs::read_to_string(conf_path)
        .map_err(|e| ConfigError::from_read(conf_path, e))?;
    let conf = parse_conf(&raw);

    let host_name = conf
        .get("sunshine_name")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::parse(conf_path, "missing required key 'sunshine_name'"))?;

    let base = conf_path.parent().unwrap_or(Path::new("."));
    let apps_path = base.join(
        conf.get("file_apps")
            .map(String::as_str)
            .unwrap_or(DEFAULT_APPS_FILE),
    );
    let state_path = base.join(
        conf.get("file_state")
            .map(String::as_str)
            .unwrap_or(DEFAULT_STATE_FILE),
    );

    let host_uuid = load_host_uuid(&state_path)?;
    let games = load_games(&apps_path, base)?;

    Ok(Catalog {
        host: HostConfig {
            name: host_name,
            uuid: host_uuid,
        },
        games,
    })
}

/// Parse the conf file's `key = value` lines. Blank lines and `#` comments
/// are ignored; later occurrences of a key win.
fn parse_conf(raw: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    map
}

fn load_host_uuid(state_path: &Path) -> Result<String, ConfigError> {
    let raw = std::fs::read_to_string(state_path)
        .map_err(|e| ConfigError::from_read(state_path, e))?;
    let state: StateFile =
        serde_json::from_str(&raw).map_err(|e| ConfigError::parse(state_path, e.to_string()))?;
    state
        .root
        .uniqueid
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::parse(state_path, "missing required field 'root.uniqueid'"))
}

fn load_games(apps_path: &Path, base: &Path) -> Result<Vec<GameEntry>, ConfigError> {
    let raw = std::fs::read_to_string(apps_path)
        .map_err(|e| ConfigError::from_read(apps_path, e))?;
    let apps: AppsFile =
        serde_json::from_str(&raw).map_err(|e| ConfigError::parse(apps_path, e.to_string()))?;

    let mut games = Vec::with_capacity(apps.apps.len());
    let mut seen = std::collections::HashSet::new();

    for (index, app) in apps.apps.into_iter().enumerate() {
        let name = app
            .name
            .map(|n| n.trim_start().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                ConfigError::parse(apps_path, format!("app #{index} is missing 'name'"))
            })?;
        let uuid = app.uuid.filter(|u| !u.is_empty()).ok_or_else(|| {
            ConfigError::parse(apps_path, format!("app '{name}' is missing 'uuid'"))
        })?;
        if !seen.insert(uuid.clone()) {
            return Err(ConfigError::parse(
                apps_path,
                format!("duplicate app uuid '{uuid}'"),
            ));
        }

        games.push(GameEntry {
            uuid,
            name,
            image_path: app.image_path.map(|p| resolve_image_path(p, base)),
        });
    }

    Ok(games)
}

/// App icons may be stored relative to the host's assets directory, which
/// sits next to the config directory.
fn resolve_image_path(raw: String, conf_dir: &Path) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        conf_dir
            .parent()
            .unwrap_or(conf_dir)
            .join("assets")
            .join(path)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
