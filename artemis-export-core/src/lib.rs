//! Core catalog model for artemis-export.
//!
//! Parses an Apollo/Sunshine host configuration and its referenced JSON
//! catalog files into a normalized, read-only model that the enrichment
//! engine and frontend exporters consume.

pub mod config;
pub mod error;
pub mod model;
pub mod util;

pub use config::load_catalog;
pub use error::ConfigError;
pub use model::{Catalog, GameEntry, HostConfig};
pub use util::sanitize_name;
