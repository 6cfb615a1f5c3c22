/// Artwork kinds the enrichment pipeline can produce for a game.
///
/// Logo/Grid/Marquee/Tile come from SteamGridDB; BoxFront/Screenshot/
/// Background come from IGDB (BoxFront may also be a local icon copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Logo,
    Grid,
    Marquee,
    Tile,
    BoxFront,
    Screenshot,
    Background,
}

impl AssetKind {
    /// Fixed on-disk file name within a game's media directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            AssetKind::Logo => "logo.png",
            AssetKind::Grid => "grid.png",
            AssetKind::Marquee => "marquee.png",
            AssetKind::Tile => "tile.png",
            AssetKind::BoxFront => "boxFront.jpg",
            AssetKind::Screenshot => "screenshot.jpg",
            AssetKind::Background => "background.jpg",
        }
    }

    /// Kinds served by SteamGridDB.
    pub fn steamgriddb_kinds() -> &'static [AssetKind] {
        &[
            AssetKind::Logo,
            AssetKind::Grid,
            AssetKind::Marquee,
            AssetKind::Tile,
        ]
    }

    /// Kinds served by IGDB.
    pub fn igdb_kinds() -> &'static [AssetKind] {
        &[
            AssetKind::BoxFront,
            AssetKind::Screenshot,
            AssetKind::Background,
        ]
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetKind::Logo => "logo",
            AssetKind::Grid => "grid",
            AssetKind::Marquee => "marquee",
            AssetKind::Tile => "tile",
            AssetKind::BoxFront => "boxFront",
            AssetKind::Screenshot => "screenshot",
            AssetKind::Background => "background",
        };
        write!(f, "{name}")
    }
}
