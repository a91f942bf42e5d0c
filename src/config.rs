use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Bootstrap admin account, created on first start if absent
    pub admin_username: String,
    pub admin_password: Secret<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Ok(Self {
            database_url: config
                .get("database_url")
                .unwrap_or_else(|_| "sqlite://gatelog.db".to_string()),
            host: config.get("host").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: config.get("port").unwrap_or(5000),

            admin_username: config
                .get("admin_username")
                .unwrap_or_else(|_| "admin".to_string()),
            admin_password: Secret::new(
                config
                    .get("admin_password")
                    .unwrap_or_else(|_| "admin123".to_string()),
            ),
        })
    }
}
