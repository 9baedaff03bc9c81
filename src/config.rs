// config.rs
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub claude_api_key: Option<String>,
    pub claude_model: String,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        // Either a full DATABASE_URL or the individual DB_* parts the
        // deployment scripts have historically set.
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
            let user = env::var("DB_USER").unwrap_or_else(|_| "root".to_string());
            let password = env::var("DB_PASSWORD").unwrap_or_default();
            let name = env::var("DB_NAME").unwrap_or_else(|_| "football_data".to_string());
            if password.is_empty() {
                format!("mysql://{}@{}/{}", user, host, name)
            } else {
                format!("mysql://{}:{}@{}/{}", user, password, host, name)
            }
        });

        let claude_api_key = match env::var("CLAUDE_API_KEY") {
            Ok(key) if !key.is_empty() => Some(key),
            _ => {
                tracing::warn!("⚠️ CLAUDE_API_KEY not set - text generation will use fallback responses");
                None
            }
        };

        AppConfig {
            database_url,
            claude_api_key,
            claude_model: env::var("CLAUDE_MODEL")
                .unwrap_or_else(|_| "claude-3-5-sonnet-20241022".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }

    pub fn claude_configured(&self) -> bool {
        self.claude_api_key.is_some()
    }
}
