use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// HS256 secret shared with the identity provider's session tokens
    pub auth_jwt_secret: String,
    /// `whsec_`-prefixed signing secret for identity webhooks
    pub identity_webhook_secret: String,
    pub push_gateway_url: Option<String>,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            auth_jwt_secret: std::env::var("AUTH_JWT_SECRET")
                .context("Cannot load AUTH_JWT_SECRET env variable")?,
            identity_webhook_secret: std::env::var("IDENTITY_WEBHOOK_SECRET")
                .context("Cannot load IDENTITY_WEBHOOK_SECRET env variable")?,
            push_gateway_url: std::env::var("PUSH_GATEWAY_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            cors_allowed_origins: parse_comma_separated(
                &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            ),
        })
    }
}

fn parse_comma_separated(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
