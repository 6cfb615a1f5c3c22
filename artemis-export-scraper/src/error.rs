/// Errors from the provider clients and the enrichment pipeline.
///
/// All of these are non-fatal at the engine level: a failing provider
/// leaves its contribution absent for that game and the run continues.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected credentials: {0}")]
    Auth(String),

    #[error("Provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Token exchange failed: {0}")]
    Token(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
