//! Frontend file generation for artemis-export.
//!
//! One [`Exporter`] implementation per supported frontend. Each consumes
//! the normalized catalog plus optional per-game enrichment and writes that
//! frontend's launcher/metadata file tree under the output directory.

pub mod asset_kinds;
pub mod daijishou;
pub mod error;
pub mod esde;
pub mod generic;
pub mod pegasus;

pub use asset_kinds::AssetKind;
pub use error::ExportError;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use artemis_export_core::{GameEntry, HostConfig, sanitize_name};

/// Android package/activity the Artemis client exposes for shortcut launches.
pub const ARTEMIS_ACTIVITY: &str = "com.limelight.noir/com.limelight.ShortcutTrampoline";

/// Structured metadata fetched for a game (IGDB).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameMetadata {
    pub summary: Option<String>,
    pub description: Option<String>,
    /// 0-100.
    pub rating: Option<u8>,
    pub genres: Vec<String>,
    /// `YYYY-MM-DD`.
    pub release_date: Option<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    /// Game modes and player perspectives, deduplicated.
    pub tags: Vec<String>,
}

/// Per-game enrichment output: downloaded asset files plus optional
/// metadata. Kept in a side table keyed by app uuid; absence means the
/// exporters emit minimal fields only.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentResult {
    pub assets: HashMap<AssetKind, PathBuf>,
    pub metadata: Option<GameMetadata>,
}

impl EnrichmentResult {
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty() && self.metadata.is_none()
    }

    /// Whether any cover-like asset is present (used for the
    /// first-provider-wins tie-break on box art).
    pub fn has_cover(&self) -> bool {
        self.assets.contains_key(&AssetKind::Grid)
            || self.assets.contains_key(&AssetKind::BoxFront)
    }
}

/// Which frontend's file tree to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportTarget {
    Pegasus,
    Daijishou,
    Esde,
    Generic,
}

impl ExportTarget {
    pub const ALL: [ExportTarget; 4] = [
        ExportTarget::Pegasus,
        ExportTarget::Daijishou,
        ExportTarget::Esde,
        ExportTarget::Generic,
    ];

    /// Output directory segment: `export/<dir_name>/<host name>/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ExportTarget::Pegasus => "pegasus",
            ExportTarget::Daijishou => "daijishou",
            ExportTarget::Esde => "esde",
            ExportTarget::Generic => "generic",
        }
    }

    /// Key used for a game's launcher file and media directory.
    ///
    /// Pegasus and Generic name files by uuid (the launch command resolves
    /// by `{file.basename}`, so a rename would break launching); Daijishō
    /// and ES-DE name by sanitized title.
    pub fn game_key(&self, game: &GameEntry) -> String {
        match self {
            ExportTarget::Pegasus | ExportTarget::Generic => game.uuid.clone(),
            ExportTarget::Daijishou | ExportTarget::Esde => sanitize_name(&game.name),
        }
    }
}

impl std::fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportTarget::Pegasus => "Pegasus",
            ExportTarget::Daijishou => "Daijish\u{14d}",
            ExportTarget::Esde => "ES-DE",
            ExportTarget::Generic => "Generic",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for ExportTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pegasus" => Ok(ExportTarget::Pegasus),
            "daijishou" | "daijisho" => Ok(ExportTarget::Daijishou),
            "esde" | "es-de" => Ok(ExportTarget::Esde),
            "generic" => Ok(ExportTarget::Generic),
            other => Err(format!(
                "unknown target '{other}' (expected pegasus, daijishou, esde or generic)"
            )),
        }
    }
}

/// A game that could not be written (non-fatal; omitted from aggregates).
#[derive(Debug, Clone)]
pub struct FailedGame {
    pub name: String,
    pub reason: String,
}

/// Files written by one exporter run, plus any per-game failures.
#[derive(Debug, Default)]
pub struct WrittenFileSet {
    pub files: Vec<PathBuf>,
    pub failed: Vec<FailedGame>,
}

impl WrittenFileSet {
    pub fn record(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    pub fn record_failure(&mut self, game: &GameEntry, err: &std::io::Error) {
        log::warn!("Failed to write launcher file for '{}': {}", game.name, err);
        self.failed.push(FailedGame {
            name: game.name.clone(),
            reason: err.to_string(),
        });
    }
}

/// One frontend's file-generation strategy.
pub trait Exporter {
    fn target(&self) -> ExportTarget;

    /// Write the full file tree for this frontend under `out_dir`.
    ///
    /// A per-game write failure is recorded and that game is omitted from
    /// the aggregate; a failure writing the aggregate itself is fatal for
    /// the target and surfaces as [`ExportError::Aggregate`].
    fn export(
        &self,
        host: &HostConfig,
        games: &[GameEntry],
        enrichment: &HashMap<String, EnrichmentResult>,
        out_dir: &Path,
    ) -> Result<WrittenFileSet, ExportError>;
}

/// Closed dispatch over the four supported targets.
pub fn exporter_for(target: ExportTarget) -> Box<dyn Exporter> {
    match target {
        ExportTarget::Pegasus => Box::new(pegasus::PegasusExporter),
        ExportTarget::Daijishou => Box::new(daijishou::DaijishouExporter),
        ExportTarget::Esde => Box::new(esde::EsDeExporter),
        ExportTarget::Generic => Box::new(generic::GenericExporter),
    }
}

/// Relative media reference for aggregate files: `./media/<key>/<file>`.
pub(crate) fn media_ref(game_key: &str, kind: AssetKind) -> String {
    format!("./media/{}/{}", game_key, kind.file_name())
}

/// Write an aggregate file, wrapping failures in the fatal variant.
pub(crate) fn write_aggregate(path: &Path, contents: &str) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Aggregate {
        path: path.to_path_buf(),
        source,
    })
}
