use std::collections::HashMap;
use std::sync::Arc;

use artemis_export_frontend::{AssetKind, GameMetadata};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Duration;

use crate::error::EnrichError;
use crate::matching;

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const GAMES_URL: &str = "https://api.igdb.com/v4/games";
const IMAGE_BASE: &str = "https://images.igdb.com/igdb/image/upload";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Minimum name similarity for accepting a non-exact search result.
const MATCH_THRESHOLD: f64 = 0.7;

/// HTTP client for the IGDB API (Twitch OAuth client-credentials flow).
///
/// The access token is cached for the whole run. A 401 from the query
/// endpoint triggers a single guarded refresh; concurrent callers holding
/// the same stale token reuse the one re-fetch instead of each issuing
/// their own. A failed grant latches: later callers fail fast instead of
/// re-posting dead credentials once per game.
///
/// Search results are memoized for the client's lifetime, so a run that
/// exports several targets queries each game once.
pub struct IgdbClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token: Arc<Mutex<TokenCell>>,
    match_cache: Arc<Mutex<HashMap<String, Option<IgdbMatch>>>>,
}

#[derive(Debug, Default)]
struct TokenCell {
    token: Option<String>,
    generation: u64,
    /// Set when a grant request fails; the run degrades to no-metadata
    /// instead of retrying the token endpoint per game.
    grant_failed: bool,
}

impl TokenCell {
    /// Whether a caller holding `stale_generation` should trigger a fetch,
    /// or just pick up the token another caller already refreshed.
    fn is_current(&self, stale_generation: u64) -> bool {
        self.generation == stale_generation
    }
}

/// Best search result for a game: structured metadata plus image
/// candidates the engine may download.
#[derive(Debug, Clone)]
pub struct IgdbMatch {
    pub metadata: GameMetadata,
    /// `(kind, url)` pairs in provider order.
    pub images: Vec<(AssetKind, String)>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
struct IgdbGame {
    name: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    storyline: Option<String>,
    #[serde(default)]
    total_rating: Option<f64>,
    #[serde(default)]
    first_release_date: Option<i64>,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    cover: Option<ImageRef>,
    #[serde(default)]
    artworks: Vec<ImageRef>,
    #[serde(default)]
    screenshots: Vec<ImageRef>,
    #[serde(default)]
    involved_companies: Vec<InvolvedCompany>,
    #[serde(default)]
    game_modes: Vec<Named>,
    #[serde(default)]
    player_perspectives: Vec<Named>,
}

#[derive(Debug, Clone, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ImageRef {
    image_id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct InvolvedCompany {
    #[serde(default)]
    developer: bool,
    #[serde(default)]
    publisher: bool,
    company: Named,
}

impl IgdbClient {
    pub fn new(client_id: String, client_secret: String) -> Result<Self, EnrichError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            client_id,
            client_secret,
            token: Arc::new(Mutex::new(TokenCell::default())),
            match_cache: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Search IGDB for a game and return the best match, or `None` when
    /// nothing passes the similarity threshold.
    pub async fn search_metadata(&self, name: &str) -> Result<Option<IgdbMatch>, EnrichError> {
        if let Some(cached) = self.match_cache.lock().await.get(name) {
            return Ok(cached.clone());
        }

        let (token, generation) = self.current_token().await?;

        let resp = self.query(name, &token).await?;
        let resp = if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            let fresh = self.refresh_token(generation).await?;
            let retry = self.query(name, &fresh).await?;
            if retry.status() == reqwest::StatusCode::UNAUTHORIZED {
                return Err(EnrichError::Auth(
                    "IGDB rejected the refreshed access token".to_string(),
                ));
            }
            retry
        } else {
            resp
        };

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(EnrichError::Provider {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let games: Vec<IgdbGame> = resp.json().await?;
        let matched = best_match(name, &games).map(build_match);
        self.match_cache
            .lock()
            .await
            .insert(name.to_string(), matched.clone());
        Ok(matched)
    }

    /// Download an image file. The image CDN takes no auth headers.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, EnrichError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(EnrichError::Provider {
                status: status.as_u16(),
                message: format!("image download failed for {url}"),
            });
        }
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn query(&self, name: &str, token: &str) -> Result<reqwest::Response, EnrichError> {
        let body = format!(
            "search \"{}\"; fields name,summary,storyline,total_rating,first_release_date,\
             genres.name,cover.image_id,artworks.image_id,screenshots.image_id,\
             involved_companies.developer,involved_companies.publisher,\
             involved_companies.company.name,game_modes.name,player_perspectives.name; \
             limit 5;",
            name.replace('"', "\\\"")
        );

        let resp = self
            .http
            .post(GAMES_URL)
            .header("Client-ID", &self.client_id)
            .bearer_auth(token)
            .body(body)
            .send()
            .await?;
        Ok(resp)
    }

    /// Return the cached token, fetching the first one on demand. A
    /// previous grant failure short-circuits without touching the network.
    async fn current_token(&self) -> Result<(String, u64), EnrichError> {
        let mut cell = self.token.lock().await;
        if let Some(ref token) = cell.token {
            return Ok((token.clone(), cell.generation));
        }
        if cell.grant_failed {
            return Err(EnrichError::Token(
                "token grant already failed this run".to_string(),
            ));
        }
        let fresh = match self.fetch_token().await {
            Ok(token) => token,
            Err(e) => {
                cell.grant_failed = true;
                return Err(e);
            }
        };
        cell.token = Some(fresh.clone());
        Ok((fresh, cell.generation))
    }

    /// Replace a stale token. Callers pass the generation they read; only
    /// the first caller with a given stale generation performs the fetch.
    async fn refresh_token(&self, stale_generation: u64) -> Result<String, EnrichError> {
        let mut cell = self.token.lock().await;
        if !cell.is_current(stale_generation) {
            if let Some(ref token) = cell.token {
                return Ok(token.clone());
            }
        }
        if cell.grant_failed {
            return Err(EnrichError::Token(
                "token grant already failed this run".to_string(),
            ));
        }
        let fresh = match self.fetch_token().await {
            Ok(token) => token,
            Err(e) => {
                cell.grant_failed = true;
                return Err(e);
            }
        };
        cell.token = Some(fresh.clone());
        cell.generation += 1;
        Ok(fresh)
    }

    async fn fetch_token(&self) -> Result<String, EnrichError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self.http.post(TOKEN_URL).form(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(EnrichError::Token(format!(
                "HTTP {}: {}",
                status.as_u16(),
                message.chars().take(200).collect::<String>()
            )));
        }

        let token: TokenResponse = resp.json().await?;
        Ok(token.access_token)
    }
}

/// Pick the best result: an exact case-insensitive name match wins
/// immediately; otherwise the highest-similarity result above threshold.
fn best_match<'a>(query: &str, games: &'a [IgdbGame]) -> Option<&'a IgdbGame> {
    if let Some(exact) = games
        .iter()
        .find(|g| g.name.eq_ignore_ascii_case(query))
    {
        return Some(exact);
    }

    games
        .iter()
        .map(|g| (g, matching::similarity(query, &g.name)))
        .filter(|(_, score)| *score >= MATCH_THRESHOLD)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(g, _)| g)
}

fn build_match(game: &IgdbGame) -> IgdbMatch {
    let mut developers = Vec::new();
    let mut publishers = Vec::new();
    for involved in &game.involved_companies {
        if involved.developer {
            developers.push(involved.company.name.clone());
        }
        if involved.publisher {
            publishers.push(involved.company.name.clone());
        }
    }

    let mut tags: Vec<String> = Vec::new();
    for named in game.game_modes.iter().chain(&game.player_perspectives) {
        if !tags.contains(&named.name) {
            tags.push(named.name.clone());
        }
    }

    let metadata = GameMetadata {
        summary: game.summary.clone(),
        description: game.storyline.clone(),
        rating: game.total_rating.map(rating_percent),
        genres: game.genres.iter().map(|g| g.name.clone()).collect(),
        release_date: game.first_release_date.and_then(format_release_date),
        developers,
        publishers,
        tags,
    };

    let mut images = Vec::new();
    if let Some(ref cover) = game.cover {
        images.push((AssetKind::BoxFront, image_url("t_cover_big", &cover.image_id)));
    }
    if let Some(shot) = game.screenshots.first() {
        images.push((
            AssetKind::Screenshot,
            image_url("t_screenshot_big", &shot.image_id),
        ));
    }
    if let Some(art) = game.artworks.first() {
        images.push((AssetKind::Background, image_url("t_1080p", &art.image_id)));
    }

    IgdbMatch { metadata, images }
}

fn rating_percent(total_rating: f64) -> u8 {
    total_rating.round().clamp(0.0, 100.0) as u8
}

fn format_release_date(unix: i64) -> Option<String> {
    chrono::DateTime::from_timestamp(unix, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

fn image_url(size: &str, image_id: &str) -> String {
    format!("{}/{}/{}.jpg", IMAGE_BASE, size, image_id)
}

#[cfg(test)]
#[path = "tests/igdb_tests.rs"]
mod tests;
