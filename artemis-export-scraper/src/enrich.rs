use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use artemis_export_frontend::{AssetKind, EnrichmentResult};
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;

use crate::igdb::IgdbClient;
use crate::log::{LogEntry, RunLog};
use crate::sgdb::SteamGridDbClient;

/// One game to enrich. The media dir is per game and per target key
/// (`.../media/<game_key>/`), computed by the caller.
#[derive(Debug, Clone)]
pub struct EnrichJob {
    pub uuid: String,
    pub name: String,
    /// Host-side icon referenced by the catalog, if any.
    pub image_path: Option<PathBuf>,
    pub media_dir: PathBuf,
}

/// Options for an enrichment run.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Skip image network calls for games whose asset files all exist.
    pub skip_existing: bool,
    /// Concurrent per-game workers.
    pub max_workers: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            skip_existing: false,
            max_workers: 4,
        }
    }
}

/// Progress events emitted during enrichment, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum EnrichEvent {
    /// A game has started processing (assigned to a worker).
    Started { index: usize, game: String },
    /// Querying a provider for a game.
    Fetching {
        index: usize,
        game: String,
        provider: &'static str,
    },
    /// Downloading a specific asset kind for a game.
    DownloadingAsset {
        index: usize,
        game: String,
        kind: AssetKind,
    },
    /// Game was skipped (existing media, cancellation).
    Skipped {
        index: usize,
        game: String,
        reason: String,
    },
    /// Game finished with some enrichment.
    Completed {
        index: usize,
        game: String,
        assets: usize,
    },
    /// Nothing could be fetched for a game (non-fatal).
    Failed {
        index: usize,
        game: String,
        reason: String,
    },
    /// All games processed.
    Done,
}

/// Result of an enrichment run: per-game results keyed by uuid, plus the
/// run log.
#[derive(Debug, Default)]
pub struct EnrichOutcome {
    pub results: HashMap<String, EnrichmentResult>,
    pub log: RunLog,
}

/// Internal result from processing a single game.
struct GameOutcome {
    uuid: String,
    result: Option<EnrichmentResult>,
    log_entry: Option<LogEntry>,
}

/// Enrich every job concurrently. Per-game failures are isolated: a game
/// that gets nothing still leaves the rest of the run untouched.
pub async fn enrich_catalog(
    sgdb: Option<&SteamGridDbClient>,
    igdb: Option<&IgdbClient>,
    jobs: Vec<EnrichJob>,
    options: &EnrichOptions,
    events: mpsc::UnboundedSender<EnrichEvent>,
    cancel: Arc<AtomicBool>,
) -> EnrichOutcome {
    let outcomes: Vec<GameOutcome> = stream::iter(jobs.into_iter().enumerate())
        .map(|(index, job)| {
            let events = events.clone();
            let cancel = cancel.clone();
            async move {
                if cancel.load(Ordering::Relaxed) {
                    // Still counted in the summary, like any other skip.
                    let _ = events.send(EnrichEvent::Skipped {
                        index,
                        game: job.name.clone(),
                        reason: "cancelled".to_string(),
                    });
                    return GameOutcome {
                        uuid: job.uuid,
                        result: None,
                        log_entry: Some(LogEntry::Skipped {
                            game: job.name,
                            reason: "cancelled".to_string(),
                        }),
                    };
                }
                process_single_game(sgdb, igdb, index, job, options, &events).await
            }
        })
        .buffer_unordered(options.max_workers.max(1))
        .collect()
        .await;

    let mut outcome = EnrichOutcome::default();
    for game in outcomes {
        if let Some(result) = game.result {
            if !result.is_empty() {
                outcome.results.insert(game.uuid, result);
            }
        }
        if let Some(entry) = game.log_entry {
            outcome.log.add(entry);
        }
    }

    let _ = events.send(EnrichEvent::Done);
    outcome
}

async fn process_single_game(
    sgdb: Option<&SteamGridDbClient>,
    igdb: Option<&IgdbClient>,
    index: usize,
    job: EnrichJob,
    options: &EnrichOptions,
    events: &mpsc::UnboundedSender<EnrichEvent>,
) -> GameOutcome {
    let game = job.name.clone();
    let _ = events.send(EnrichEvent::Started {
        index,
        game: game.clone(),
    });

    let mut result = EnrichmentResult::default();
    let mut downloaded: Vec<String> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    if let Err(e) = std::fs::create_dir_all(&job.media_dir) {
        let message = format!("Failed to create media dir: {}", e);
        let _ = events.send(EnrichEvent::Failed {
            index,
            game: game.clone(),
            reason: message.clone(),
        });
        return GameOutcome {
            uuid: job.uuid,
            result: None,
            log_entry: Some(LogEntry::Error {
                game,
                message,
            }),
        };
    }

    // The host-side icon is the fallback box art.
    copy_local_icon(&job, &mut result);

    let expected = expected_kinds(sgdb.is_some(), igdb.is_some());
    let existing = existing_assets(&job.media_dir, &expected);
    let skip_images = options.skip_existing && expected.iter().all(|k| existing.contains_key(k));

    if skip_images {
        result.assets.extend(existing);

        // Metadata is cheap to keep fresh even when images are skipped.
        if let Some(igdb) = igdb {
            fetch_igdb(
                igdb, index, &job, &mut result, &mut downloaded, &mut errors, true, events,
            )
            .await;
        }

        let _ = events.send(EnrichEvent::Skipped {
            index,
            game: game.clone(),
            reason: "media already exists".to_string(),
        });
        return GameOutcome {
            uuid: job.uuid,
            result: Some(result),
            log_entry: Some(LogEntry::Skipped {
                game,
                reason: "media already exists".to_string(),
            }),
        };
    }

    if let Some(sgdb) = sgdb {
        fetch_steamgriddb(sgdb, index, &job, &mut result, &mut downloaded, &mut errors, events)
            .await;
    }

    if let Some(igdb) = igdb {
        fetch_igdb(
            igdb, index, &job, &mut result, &mut downloaded, &mut errors, false, events,
        )
        .await;
    }

    if result.is_empty() {
        return if errors.is_empty() {
            let _ = events.send(EnrichEvent::Failed {
                index,
                game: game.clone(),
                reason: "no match on any provider".to_string(),
            });
            GameOutcome {
                uuid: job.uuid,
                result: None,
                log_entry: Some(LogEntry::NoMatch { game }),
            }
        } else {
            let message = errors.join("; ");
            let _ = events.send(EnrichEvent::Failed {
                index,
                game: game.clone(),
                reason: message.clone(),
            });
            GameOutcome {
                uuid: job.uuid,
                result: None,
                log_entry: Some(LogEntry::Error { game, message }),
            }
        };
    }

    let _ = events.send(EnrichEvent::Completed {
        index,
        game: game.clone(),
        assets: result.assets.len(),
    });
    let has_metadata = result.metadata.is_some();
    GameOutcome {
        uuid: job.uuid,
        result: Some(result),
        log_entry: Some(LogEntry::Enriched {
            game,
            assets_downloaded: downloaded,
            metadata: has_metadata,
        }),
    }
}

/// Copy the catalog's own icon into the media dir as box art, unless one
/// is already there. Local copies never hit the network.
fn copy_local_icon(job: &EnrichJob, result: &mut EnrichmentResult) {
    let Some(ref source) = job.image_path else {
        return;
    };
    if !source.exists() {
        return;
    }

    let dest = local_icon_dest(&job.media_dir);
    if dest.exists() {
        result.assets.insert(AssetKind::BoxFront, dest);
        return;
    }
    match std::fs::copy(source, &dest) {
        Ok(_) => {
            result.assets.insert(AssetKind::BoxFront, dest);
        }
        Err(e) => {
            log::debug!("Failed to copy icon for '{}': {}", job.name, e);
        }
    }
}

/// Host icons are PNGs, unlike the provider-downloaded `boxFront.jpg`.
fn local_icon_dest(media_dir: &Path) -> PathBuf {
    media_dir.join("boxFront.png")
}

/// Asset kinds the enabled providers are expected to produce.
fn expected_kinds(sgdb_enabled: bool, igdb_enabled: bool) -> Vec<AssetKind> {
    let mut kinds = Vec::new();
    if sgdb_enabled {
        kinds.extend_from_slice(AssetKind::steamgriddb_kinds());
    }
    if igdb_enabled {
        kinds.extend_from_slice(AssetKind::igdb_kinds());
    }
    kinds
}

/// Scan the media dir for already-downloaded asset files.
fn existing_assets(media_dir: &Path, kinds: &[AssetKind]) -> HashMap<AssetKind, PathBuf> {
    kinds
        .iter()
        .filter_map(|kind| {
            let path = media_dir.join(kind.file_name());
            path.exists().then_some((*kind, path))
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
async fn fetch_steamgriddb(
    client: &SteamGridDbClient,
    index: usize,
    job: &EnrichJob,
    result: &mut EnrichmentResult,
    downloaded: &mut Vec<String>,
    errors: &mut Vec<String>,
    events: &mpsc::UnboundedSender<EnrichEvent>,
) {
    let _ = events.send(EnrichEvent::Fetching {
        index,
        game: job.name.clone(),
        provider: "SteamGridDB",
    });

    let game_id = match client.search_game(&job.name).await {
        Ok(Some(id)) => id,
        Ok(None) => return,
        Err(e) => {
            errors.push(format!("SteamGridDB: {}", e));
            return;
        }
    };

    for kind in AssetKind::steamgriddb_kinds() {
        let dest = job.media_dir.join(kind.file_name());
        if dest.exists() {
            result.assets.insert(*kind, dest);
            continue;
        }

        let candidate = match client.asset_candidate(game_id, *kind).await {
            Ok(Some(candidate)) => candidate,
            Ok(None) => continue,
            Err(e) => {
                log::debug!("SteamGridDB {} lookup failed for '{}': {}", kind, job.name, e);
                continue;
            }
        };

        let _ = events.send(EnrichEvent::DownloadingAsset {
            index,
            game: job.name.clone(),
            kind: *kind,
        });
        match client.download(&candidate.url).await {
            Ok(bytes) => match std::fs::write(&dest, bytes) {
                Ok(()) => {
                    result.assets.insert(*kind, dest);
                    downloaded.push(kind.to_string());
                }
                Err(e) => {
                    log::debug!("Failed to write {} for '{}': {}", kind, job.name, e);
                }
            },
            Err(e) => {
                log::debug!("Failed to download {} for '{}': {}", kind, job.name, e);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn fetch_igdb(
    client: &IgdbClient,
    index: usize,
    job: &EnrichJob,
    result: &mut EnrichmentResult,
    downloaded: &mut Vec<String>,
    errors: &mut Vec<String>,
    metadata_only: bool,
    events: &mpsc::UnboundedSender<EnrichEvent>,
) {
    let _ = events.send(EnrichEvent::Fetching {
        index,
        game: job.name.clone(),
        provider: "IGDB",
    });

    let matched = match client.search_metadata(&job.name).await {
        Ok(Some(matched)) => matched,
        Ok(None) => return,
        Err(e) => {
            errors.push(format!("IGDB: {}", e));
            return;
        }
    };

    result.metadata = Some(matched.metadata);
    if metadata_only {
        return;
    }

    for (kind, url) in matched.images {
        // Box art from an earlier source wins over the IGDB cover.
        if kind == AssetKind::BoxFront && result.has_cover() {
            continue;
        }

        let dest = job.media_dir.join(kind.file_name());
        if dest.exists() {
            result.assets.insert(kind, dest);
            continue;
        }

        let _ = events.send(EnrichEvent::DownloadingAsset {
            index,
            game: job.name.clone(),
            kind,
        });
        match client.download(&url).await {
            Ok(bytes) => match std::fs::write(&dest, bytes) {
                Ok(()) => {
                    result.assets.insert(kind, dest);
                    downloaded.push(kind.to_string());
                }
                Err(e) => {
                    log::debug!("Failed to write {} for '{}': {}", kind, job.name, e);
                }
            },
            Err(e) => {
                log::debug!("Failed to download {} for '{}': {}", kind, job.name, e);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/enrich_tests.rs"]
mod tests;
