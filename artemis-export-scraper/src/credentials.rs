use std::path::PathBuf;

use crate::error::EnrichError;

/// API credentials for the artwork/metadata providers. Every field is
/// optional; a missing credential simply disables that provider.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub steamgriddb_api_key: Option<String>,
    pub igdb_client_id: Option<String>,
    pub igdb_client_secret: Option<String>,
}

/// Where a credential field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each credential field.
#[derive(Debug)]
pub struct CredentialSources {
    pub steamgriddb_api_key: CredentialSource,
    pub igdb_client_id: CredentialSource,
    pub igdb_client_secret: CredentialSource,
}

/// TOML config file format.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    steamgriddb: Option<SteamGridDbConfig>,
    igdb: Option<IgdbConfig>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct SteamGridDbConfig {
    api_key: Option<String>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct IgdbConfig {
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl Credentials {
    /// Load credentials from environment variables or the config file.
    ///
    /// Priority: env vars > config file. All fields are optional.
    pub fn load() -> Self {
        let config = load_config_file();

        let steamgriddb_api_key = std::env::var("STEAMGRIDDB_API_KEY").ok().or_else(|| {
            config
                .as_ref()
                .and_then(|c| c.steamgriddb.as_ref())
                .and_then(|s| s.api_key.clone())
        });

        let igdb_client_id = std::env::var("IGDB_CLIENT_ID").ok().or_else(|| {
            config
                .as_ref()
                .and_then(|c| c.igdb.as_ref())
                .and_then(|i| i.client_id.clone())
        });

        let igdb_client_secret = std::env::var("IGDB_CLIENT_SECRET").ok().or_else(|| {
            config
                .as_ref()
                .and_then(|c| c.igdb.as_ref())
                .and_then(|i| i.client_secret.clone())
        });

        Self {
            steamgriddb_api_key,
            igdb_client_id,
            igdb_client_secret,
        }
    }

    /// Apply explicit values (e.g. from CLI args) over the loaded ones.
    pub fn with_overrides(
        mut self,
        steamgriddb_api_key: Option<String>,
        igdb_client_id: Option<String>,
        igdb_client_secret: Option<String>,
    ) -> Self {
        if let Some(key) = steamgriddb_api_key {
            self.steamgriddb_api_key = Some(key);
        }
        if let Some(id) = igdb_client_id {
            self.igdb_client_id = Some(id);
        }
        if let Some(secret) = igdb_client_secret {
            self.igdb_client_secret = Some(secret);
        }
        self
    }

    /// Whether the SteamGridDB client can be constructed.
    pub fn steamgriddb_enabled(&self) -> bool {
        self.steamgriddb_api_key.is_some()
    }

    /// Whether the IGDB client can be constructed (needs both halves).
    pub fn igdb_enabled(&self) -> bool {
        self.igdb_client_id.is_some() && self.igdb_client_secret.is_some()
    }

    pub fn any_configured(&self) -> bool {
        self.steamgriddb_enabled() || self.igdb_enabled()
    }
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("artemis-export").join("credentials.toml"))
}

/// Save credentials to the config file, creating parent directories as needed.
/// Returns the path the file was written to.
pub fn save_to_file(creds: &Credentials) -> Result<PathBuf, EnrichError> {
    let path = config_path()
        .ok_or_else(|| EnrichError::Config("Could not determine config directory".to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let config = ConfigFile {
        steamgriddb: Some(SteamGridDbConfig {
            api_key: creds.steamgriddb_api_key.clone(),
        }),
        igdb: Some(IgdbConfig {
            client_id: creds.igdb_client_id.clone(),
            client_secret: creds.igdb_client_secret.clone(),
        }),
    };

    let toml_str = toml::to_string_pretty(&config)
        .map_err(|e| EnrichError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(&path, toml_str)?;
    Ok(path)
}

/// Determine where each credential field is coming from.
pub fn credential_sources() -> CredentialSources {
    let config = load_config_file();

    let steamgriddb_api_key = if std::env::var("STEAMGRIDDB_API_KEY").is_ok() {
        CredentialSource::EnvVar("STEAMGRIDDB_API_KEY")
    } else if config
        .as_ref()
        .and_then(|c| c.steamgriddb.as_ref())
        .and_then(|s| s.api_key.as_ref())
        .is_some()
    {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Missing
    };

    let igdb_client_id = if std::env::var("IGDB_CLIENT_ID").is_ok() {
        CredentialSource::EnvVar("IGDB_CLIENT_ID")
    } else if config
        .as_ref()
        .and_then(|c| c.igdb.as_ref())
        .and_then(|i| i.client_id.as_ref())
        .is_some()
    {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Missing
    };

    let igdb_client_secret = if std::env::var("IGDB_CLIENT_SECRET").is_ok() {
        CredentialSource::EnvVar("IGDB_CLIENT_SECRET")
    } else if config
        .as_ref()
        .and_then(|c| c.igdb.as_ref())
        .and_then(|i| i.client_secret.as_ref())
        .is_some()
    {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Missing
    };

    CredentialSources {
        steamgriddb_api_key,
        igdb_client_id,
        igdb_client_secret,
    }
}

fn load_config_file() -> Option<ConfigFile> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_loaded_values() {
        let creds = Credentials {
            steamgriddb_api_key: Some("old".to_string()),
            ..Credentials::default()
        }
        .with_overrides(Some("new".to_string()), Some("id".to_string()), None);

        assert_eq!(creds.steamgriddb_api_key.as_deref(), Some("new"));
        assert_eq!(creds.igdb_client_id.as_deref(), Some("id"));
        assert!(creds.igdb_client_secret.is_none());
    }

    #[test]
    fn test_igdb_needs_both_halves() {
        let creds = Credentials {
            igdb_client_id: Some("id".to_string()),
            ..Credentials::default()
        };
        assert!(!creds.igdb_enabled());
        assert!(!creds.any_configured());
    }
}
