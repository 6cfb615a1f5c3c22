use std::path::PathBuf;

/// The streaming host a catalog was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Display name, used as an output directory segment and collection title.
    pub name: String,
    /// Stable identifier referenced by client launch commands.
    pub uuid: String,
}

/// One streamable application from the host's catalog.
///
/// Entries are never mutated after loading; enrichment results are kept in
/// a side table keyed by `uuid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    /// Unique within a host.
    pub uuid: String,
    pub name: String,
    /// User-supplied icon from the host's assets, if any.
    pub image_path: Option<PathBuf>,
}

/// The normalized catalog: host identity plus applications in file order.
///
/// Order is preserved from apps.json so exported aggregate files are
/// deterministic across runs.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub host: HostConfig,
    pub games: Vec<GameEntry>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }
}
