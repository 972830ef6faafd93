use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Vision API key. Absence is not fatal at startup: requests that
    /// need it fail fast with a structured error instead.
    pub vision_api_key: Option<String>,

    // Web server
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let vision_api_key = env::var("VISION_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        if vision_api_key.is_none() {
            tracing::warn!("VISION_API_KEY is not set; spread requests will be rejected");
        }

        Self {
            vision_api_key,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("PORT must be a number"),
        }
    }
}
