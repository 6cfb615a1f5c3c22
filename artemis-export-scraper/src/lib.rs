//! Artwork and metadata enrichment for artemis-export.
//!
//! Wraps the SteamGridDB and IGDB APIs behind small async clients and runs
//! a concurrent per-game enrichment pipeline whose output feeds the
//! frontend exporters.

pub mod credentials;
pub mod enrich;
pub mod error;
pub mod igdb;
pub mod log;
pub mod matching;
pub mod sgdb;

pub use credentials::{
    CredentialSource, CredentialSources, Credentials, config_path, credential_sources,
    save_to_file,
};
pub use enrich::{EnrichEvent, EnrichJob, EnrichOptions, EnrichOutcome, enrich_catalog};
pub use error::EnrichError;
pub use igdb::IgdbClient;
pub use log::{LogEntry, RunLog, RunSummary};
pub use sgdb::SteamGridDbClient;
