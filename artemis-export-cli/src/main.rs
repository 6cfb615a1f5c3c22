//! artemis-export CLI
//!
//! Command-line interface for exporting an Apollo/Sunshine app catalog
//! into frontend launcher and metadata file trees.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use artemis_export_frontend::ExportTarget;

mod commands;
mod spinner;

#[derive(Parser)]
#[command(name = "artemis-export")]
#[command(about = "Export an Apollo/Sunshine app catalog to frontend launchers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate launcher files and metadata for one or more frontends
    Export {
        /// Path to the host's sunshine.conf / apollo.conf
        conf: PathBuf,

        /// Frontends to export (pegasus,daijishou,esde,generic; default all)
        #[arg(short, long, value_delimiter = ',')]
        targets: Option<Vec<ExportTarget>>,

        /// Output root directory
        #[arg(short, long, default_value = "export")]
        out_dir: PathBuf,

        /// Disable artwork/metadata enrichment even when credentials exist
        #[arg(long)]
        no_enrich: bool,

        /// Skip image downloads for games whose media files all exist
        #[arg(long)]
        skip_existing: bool,

        /// Disable the enrichment log file
        #[arg(long)]
        no_log: bool,

        /// Concurrent enrichment workers
        #[arg(long, default_value_t = 4)]
        workers: usize,

        /// SteamGridDB API key (overrides env/config)
        #[arg(long)]
        steamgriddb_api_key: Option<String>,

        /// IGDB (Twitch) client id (overrides env/config)
        #[arg(long)]
        igdb_client_id: Option<String>,

        /// IGDB (Twitch) client secret (overrides env/config)
        #[arg(long)]
        igdb_client_secret: Option<String>,
    },

    /// Manage provider credentials configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current credentials and their sources
    Show,

    /// Interactively set up credentials
    Setup,

    /// Print the config file path
    Path,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            conf,
            targets,
            out_dir,
            no_enrich,
            skip_existing,
            no_log,
            workers,
            steamgriddb_api_key,
            igdb_client_id,
            igdb_client_secret,
        } => {
            let args = commands::export::ExportArgs {
                conf,
                targets: targets.unwrap_or_else(|| ExportTarget::ALL.to_vec()),
                out_dir,
                no_enrich,
                skip_existing,
                no_log,
                workers,
                steamgriddb_api_key,
                igdb_client_id,
                igdb_client_secret,
            };
            commands::export::run_export(args)
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => commands::config::run_config_show(),
                ConfigAction::Setup => commands::config::run_config_setup(),
                ConfigAction::Path => commands::config::run_config_path(),
            }
            ExitCode::SUCCESS
        }
    }
}

/// Message-only log output, info level by default (RUST_LOG overrides).
fn init_logging() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}
