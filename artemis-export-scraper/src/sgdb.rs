use std::collections::HashMap;
use std::sync::Arc;

use artemis_export_frontend::AssetKind;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Duration;

use crate::error::EnrichError;

const BASE_URL: &str = "https://www.steamgriddb.com/api/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the SteamGridDB API (bearer-token auth).
///
/// Search and candidate lookups are memoized for the client's lifetime, so
/// a run that exports several targets queries each game once.
pub struct SteamGridDbClient {
    http: reqwest::Client,
    api_key: String,
    search_cache: Arc<Mutex<HashMap<String, Option<i64>>>>,
    candidate_cache: Arc<Mutex<HashMap<(i64, AssetKind), Option<AssetCandidate>>>>,
}

/// One downloadable artwork candidate.
#[derive(Debug, Clone)]
pub struct AssetCandidate {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    success: bool,
    #[serde(default)]
    data: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    success: bool,
    #[serde(default)]
    data: Vec<AssetRecord>,
}

#[derive(Debug, Deserialize)]
struct AssetRecord {
    url: String,
}

impl SteamGridDbClient {
    pub fn new(api_key: String) -> Result<Self, EnrichError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key,
            search_cache: Arc::new(Mutex::new(HashMap::new())),
            candidate_cache: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Resolve a game name to a SteamGridDB game id. First hit wins.
    pub async fn search_game(&self, name: &str) -> Result<Option<i64>, EnrichError> {
        if let Some(cached) = self.search_cache.lock().await.get(name) {
            return Ok(*cached);
        }

        let resp = self
            .http
            .get(search_url(name))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let body: SearchResponse = check_status(resp).await?.json().await?;
        let id = if body.success {
            body.data.first().map(|hit| hit.id)
        } else {
            None
        };
        self.search_cache.lock().await.insert(name.to_string(), id);
        Ok(id)
    }

    /// Fetch the best artwork candidate for a kind. First result wins.
    ///
    /// Returns `None` for kinds SteamGridDB does not serve.
    pub async fn asset_candidate(
        &self,
        game_id: i64,
        kind: AssetKind,
    ) -> Result<Option<AssetCandidate>, EnrichError> {
        let Some((endpoint, params)) = kind_query(kind) else {
            return Ok(None);
        };

        if let Some(cached) = self.candidate_cache.lock().await.get(&(game_id, kind)) {
            return Ok(cached.clone());
        }

        let url = format!("{}/{}/game/{}", BASE_URL, endpoint, game_id);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(params)
            .send()
            .await?;

        let body: AssetResponse = check_status(resp).await?.json().await?;
        let candidate = if body.success {
            body.data
                .into_iter()
                .next()
                .map(|record| AssetCandidate { url: record.url })
        } else {
            None
        };
        self.candidate_cache
            .lock()
            .await
            .insert((game_id, kind), candidate.clone());
        Ok(candidate)
    }

    /// Download an artwork file. CDN URLs carry no auth header.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, EnrichError> {
        let resp = self.http.get(url).send().await?;
        let bytes = check_status(resp).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Build the search URL with the name as a percent-encoded path segment;
/// titles with `?`, `#` or `/` must not bleed into URL structure.
fn search_url(name: &str) -> reqwest::Url {
    let mut url = reqwest::Url::parse(BASE_URL).expect("static base URL");
    url.path_segments_mut()
        .expect("base URL has a path")
        .extend(["search", "autocomplete", name]);
    url
}

/// API endpoint and query parameters per asset kind.
fn kind_query(kind: AssetKind) -> Option<(&'static str, &'static [(&'static str, &'static str)])> {
    match kind {
        AssetKind::Logo => Some(("logos", &[])),
        AssetKind::Grid => Some((
            "grids",
            &[
                ("dimensions", "460x215,920x430,600x900,342x482,660x930"),
                ("types", "static"),
                ("mimes", "image/png"),
            ],
        )),
        AssetKind::Marquee => Some((
            "heroes",
            &[("types", "static"), ("mimes", "image/png")],
        )),
        AssetKind::Tile => Some(("grids", &[("dimensions", "512x512,1024x1024")])),
        AssetKind::BoxFront | AssetKind::Screenshot | AssetKind::Background => None,
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, EnrichError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(EnrichError::Auth(
            "SteamGridDB rejected the API key".to_string(),
        ));
    }
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(EnrichError::Provider {
            status: status.as_u16(),
            message: message.chars().take(200).collect(),
        });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_query_coverage() {
        for kind in AssetKind::steamgriddb_kinds() {
            assert!(kind_query(*kind).is_some(), "{kind} should have a query");
        }
        for kind in AssetKind::igdb_kinds() {
            assert!(kind_query(*kind).is_none(), "{kind} is not served by SGDB");
        }
    }

    #[test]
    fn test_grid_query_dimensions() {
        let (endpoint, params) = kind_query(AssetKind::Grid).unwrap();
        assert_eq!(endpoint, "grids");
        assert!(params
            .iter()
            .any(|(k, v)| *k == "dimensions" && v.contains("600x900")));
    }

    #[test]
    fn test_search_url_encodes_special_names() {
        let url = search_url("What the Golf?");
        assert_eq!(url.path(), "/api/v2/search/autocomplete/What%20the%20Golf%3F");
        assert_eq!(url.query(), None);

        let url = search_url("Ni no Kuni #2/Remix");
        assert!(url.path().ends_with("/Ni%20no%20Kuni%20%232%2FRemix"));
        assert_eq!(url.fragment(), None);
    }

    #[tokio::test]
    async fn test_search_game_returns_memoized_id() {
        let client = SteamGridDbClient::new("key".to_string()).unwrap();
        client
            .search_cache
            .lock()
            .await
            .insert("Halo".to_string(), Some(42));
        assert_eq!(client.search_game("Halo").await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_asset_candidate_returns_memoized_candidate() {
        let client = SteamGridDbClient::new("key".to_string()).unwrap();
        client.candidate_cache.lock().await.insert(
            (42, AssetKind::Grid),
            Some(AssetCandidate {
                url: "https://cdn.example/grid.png".to_string(),
            }),
        );
        let candidate = client
            .asset_candidate(42, AssetKind::Grid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(candidate.url, "https://cdn.example/grid.png");
    }
}
