use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub identity_provider_url: String,
    pub identity_provider_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            identity_provider_url: env::var("IDENTITY_PROVIDER_URL")
                .context("IDENTITY_PROVIDER_URL must be set")?,
            identity_provider_api_key: env::var("IDENTITY_PROVIDER_API_KEY").ok(),
        })
    }
}
