//! The export command: load the catalog, optionally enrich it, and write
//! each requested frontend's file tree.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::sync::mpsc;

use artemis_export_core::Catalog;
use artemis_export_frontend::{EnrichmentResult, ExportTarget, exporter_for};
use artemis_export_scraper::{
    Credentials, EnrichEvent, EnrichJob, EnrichOptions, IgdbClient, RunSummary,
    SteamGridDbClient, enrich_catalog,
};

use crate::spinner::SpinnerPool;

pub(crate) struct ExportArgs {
    pub conf: PathBuf,
    pub targets: Vec<ExportTarget>,
    pub out_dir: PathBuf,
    pub no_enrich: bool,
    pub skip_existing: bool,
    pub no_log: bool,
    pub workers: usize,
    pub steamgriddb_api_key: Option<String>,
    pub igdb_client_id: Option<String>,
    pub igdb_client_secret: Option<String>,
}

pub(crate) fn run_export(args: ExportArgs) -> ExitCode {
    // A broken conf aborts the whole run; everything later degrades per
    // game or per target instead.
    let catalog = match artemis_export_core::load_catalog(&args.conf) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Host: {} {}",
        catalog.host.name.if_supports_color(Stdout, |t| t.bold()),
        format!("({})", catalog.host.uuid).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!(
        "Apps: {}, output root: {}",
        catalog.len(),
        args.out_dir.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if catalog.is_empty() {
        log::info!(
            "{}",
            "Catalog is empty; aggregates will be written without games."
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let creds = Credentials::load().with_overrides(
        args.steamgriddb_api_key.clone(),
        args.igdb_client_id.clone(),
        args.igdb_client_secret.clone(),
    );

    let (sgdb, igdb) = if args.no_enrich {
        log::info!(
            "{}",
            "Enrichment disabled (--no-enrich)".if_supports_color(Stdout, |t| t.dimmed()),
        );
        (None, None)
    } else {
        build_clients(&creds)
    };
    log::info!("");

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    rt.block_on(async {
        let mut had_failure = false;
        let mut total_written = 0usize;
        let mut total_failed = 0usize;
        let mut run_summary = RunSummary::default();

        let cancel = Arc::new(AtomicBool::new(false));
        spawn_interrupt_watch(cancel.clone());

        for target in &args.targets {
            let out_dir = args
                .out_dir
                .join(target.dir_name())
                .join(&catalog.host.name);

            log::info!("{}", target.to_string().if_supports_color(Stdout, |t| t.bold()));

            if let Err(e) = std::fs::create_dir_all(&out_dir) {
                log::warn!(
                    "  {} Could not create {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    out_dir.display(),
                    e,
                );
                had_failure = true;
                continue;
            }

            let enrichment = if sgdb.is_some() || igdb.is_some() {
                let (summary, results) = enrich_target(
                    sgdb.as_ref(),
                    igdb.as_ref(),
                    &catalog,
                    *target,
                    &out_dir,
                    &args,
                    cancel.clone(),
                )
                .await;
                run_summary.enriched += summary.enriched;
                run_summary.skipped += summary.skipped;
                run_summary.no_match += summary.no_match;
                run_summary.errors += summary.errors;
                run_summary.assets_downloaded += summary.assets_downloaded;
                results
            } else {
                HashMap::new()
            };

            match exporter_for(*target).export(
                &catalog.host,
                &catalog.games,
                &enrichment,
                &out_dir,
            ) {
                Ok(set) => {
                    total_written += set.files.len();
                    total_failed += set.failed.len();
                    log::info!(
                        "  {} {} files written to {}",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        set.files.len(),
                        out_dir.display().if_supports_color(Stdout, |t| t.dimmed()),
                    );
                    for failed in &set.failed {
                        log::warn!(
                            "  {} '{}' not written: {}",
                            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                            failed.name,
                            failed.reason,
                        );
                    }
                }
                Err(e) => {
                    log::warn!(
                        "  {} Export failed: {}",
                        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                        e,
                    );
                    had_failure = true;
                }
            }
            log::info!("");
        }

        print_summary(&args.targets, total_written, total_failed, &run_summary);

        if had_failure {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    })
}

/// Construct provider clients from whatever credentials are present.
fn build_clients(creds: &Credentials) -> (Option<SteamGridDbClient>, Option<IgdbClient>) {
    let sgdb = creds.steamgriddb_api_key.clone().and_then(|key| {
        match SteamGridDbClient::new(key) {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("Could not create SteamGridDB client: {}", e);
                None
            }
        }
    });

    let igdb = match (
        creds.igdb_client_id.clone(),
        creds.igdb_client_secret.clone(),
    ) {
        (Some(id), Some(secret)) => match IgdbClient::new(id, secret) {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("Could not create IGDB client: {}", e);
                None
            }
        },
        _ => None,
    };

    if sgdb.is_none() && igdb.is_none() {
        log::info!(
            "{}",
            "No provider credentials configured; exporting without enrichment."
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
        log::info!("Run 'artemis-export config setup' to add credentials.");
    }

    (sgdb, igdb)
}

/// Run enrichment for one target's media layout, driving spinners from the
/// event channel.
async fn enrich_target(
    sgdb: Option<&SteamGridDbClient>,
    igdb: Option<&IgdbClient>,
    catalog: &Catalog,
    target: ExportTarget,
    out_dir: &std::path::Path,
    args: &ExportArgs,
    cancel: Arc<AtomicBool>,
) -> (RunSummary, HashMap<String, EnrichmentResult>) {
    let media_root = out_dir.join("media");
    let jobs: Vec<EnrichJob> = catalog
        .games
        .iter()
        .map(|game| EnrichJob {
            uuid: game.uuid.clone(),
            name: game.name.clone(),
            image_path: game.image_path.clone(),
            media_dir: media_root.join(target.game_key(game)),
        })
        .collect();
    let total = jobs.len();

    let options = EnrichOptions {
        skip_existing: args.skip_existing,
        max_workers: args.workers,
    };
    let (event_tx, event_rx) = mpsc::unbounded_channel::<EnrichEvent>();

    let mut pool = SpinnerPool::new(args.workers.max(1));

    let outcome = run_with_events(
        enrich_catalog(sgdb, igdb, jobs, &options, event_tx, cancel),
        event_rx,
        |event| match event {
            EnrichEvent::Started { index, ref game } => {
                pool.claim(index, format!("[{}/{}] {}", index + 1, total, game));
            }
            EnrichEvent::Fetching {
                index,
                ref game,
                provider,
            } => {
                pool.update(
                    index,
                    format!("[{}/{}] Querying {} for {}", index + 1, total, provider, game),
                );
            }
            EnrichEvent::DownloadingAsset {
                index,
                ref game,
                kind,
            } => {
                pool.update(
                    index,
                    format!("[{}/{}] Downloading {} for {}", index + 1, total, kind, game),
                );
            }
            EnrichEvent::Skipped {
                index,
                ref game,
                ref reason,
            } => {
                pool.update(
                    index,
                    format!("[{}/{}] Skipped {}: {}", index + 1, total, game, reason),
                );
                pool.release(index);
            }
            EnrichEvent::Completed {
                index,
                ref game,
                assets,
            } => {
                pool.update(
                    index,
                    format!("[{}/{}] {} ({} assets)", index + 1, total, game, assets),
                );
                pool.release(index);
            }
            EnrichEvent::Failed {
                index,
                ref game,
                ref reason,
            } => {
                pool.update(
                    index,
                    format!("[{}/{}] {} failed: {}", index + 1, total, game, reason),
                );
                pool.release(index);
            }
            EnrichEvent::Done => {}
        },
    )
    .await;

    pool.clear_all();

    let summary = outcome.log.summary();
    if !args.no_log && !outcome.log.entries().is_empty() {
        let log_path = out_dir.join(format!(
            "enrich-log-{}.txt",
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
        ));
        if let Err(e) = outcome.log.write_to_file(&log_path) {
            log::warn!("Warning: could not write enrichment log: {}", e);
        }
    }

    (summary, outcome.results)
}

/// Flip the cancel flag on Ctrl-C: in-flight games finish, the rest are
/// skipped and counted in the run log.
fn spawn_interrupt_watch(cancel: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received; skipping remaining games.");
            cancel.store(true, Ordering::Relaxed);
        }
    });
}

/// Drive an async task while processing events from its channel. Returns
/// the task's result after the channel is fully drained.
async fn run_with_events<F, E, R>(
    task: F,
    mut event_rx: mpsc::UnboundedReceiver<E>,
    mut on_event: impl FnMut(E),
) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);
    let mut result = None;

    loop {
        tokio::select! {
            r = &mut task, if result.is_none() => {
                result = Some(r);
            }
            event = event_rx.recv() => match event {
                Some(e) => on_event(e),
                // Channel closes once the task drops its sender.
                None => break,
            },
        }
    }

    match result {
        Some(r) => r,
        // Senders all dropped before the task finished its return path.
        None => task.await,
    }
}

fn print_summary(
    targets: &[ExportTarget],
    total_written: usize,
    total_failed: usize,
    run_summary: &RunSummary,
) {
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} files written across {} target(s)",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        total_written,
        targets.len(),
    );
    if total_failed > 0 {
        log::warn!(
            "  {} {} games not written",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            total_failed,
        );
    }

    let enriched_any = run_summary.enriched
        + run_summary.skipped
        + run_summary.no_match
        + run_summary.errors;
    if enriched_any > 0 {
        log::info!(
            "  Enrichment: {} enriched, {} skipped, {} no match, {} errors, {} assets downloaded",
            run_summary.enriched,
            run_summary.skipped,
            run_summary.no_match,
            run_summary.errors,
            run_summary.assets_downloaded,
        );
    }
}
