use serde::Deserialize;

pub const DEFAULT_GOOGLE_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub google_places_api_key: String,
    pub openai_api_key: String,
    /// Base URL of the place-search provider. Overridable via env.
    pub google_places_base_url: String,
    pub openai_api_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            google_places_api_key: std::env::var("GOOGLE_PLACES_API_KEY")
                .map_err(|_| {
                    anyhow::anyhow!("GOOGLE_PLACES_API_KEY environment variable required")
                })
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("GOOGLE_PLACES_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("OPENAI_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            google_places_base_url: std::env::var("GOOGLE_PLACES_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GOOGLE_PLACES_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_URL.to_string()),
        };

        if !config.google_places_base_url.starts_with("http://")
            && !config.google_places_base_url.starts_with("https://")
        {
            anyhow::bail!("GOOGLE_PLACES_BASE_URL must start with http:// or https://");
        }
        if !config.openai_api_url.starts_with("http://")
            && !config.openai_api_url.starts_with("https://")
        {
            anyhow::bail!("OPENAI_API_URL must start with http:// or https://");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Place search base URL: {}", config.google_places_base_url);
        tracing::debug!("Reasoning API URL: {}", config.openai_api_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
