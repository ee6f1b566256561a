use std::sync::Arc;

use anyhow::Context;
use storage::Database;

mod config;
mod error;
mod features;
mod middleware;
mod openapi;
mod push;
mod routes;
mod state;

use config::Config;
use features::webhooks::signature::WebhookVerifier;
use middleware::auth::SessionVerifier;
use push::{GatewayPushTransport, LogPushTransport, PushTransport};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting workout API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let push: Arc<dyn PushTransport> = match &config.push_gateway_url {
        Some(url) => {
            tracing::info!("Push notifications go through gateway {}", url);
            Arc::new(GatewayPushTransport::new(url.as_str()).context("Failed to build push client")?)
        }
        None => {
            tracing::warn!("PUSH_GATEWAY_URL not set, notifications will only be logged");
            Arc::new(LogPushTransport)
        }
    };

    let webhooks = WebhookVerifier::from_secret(&config.identity_webhook_secret)
        .context("Invalid IDENTITY_WEBHOOK_SECRET")?;

    let state = AppState {
        db,
        sessions: SessionVerifier::from_secret(&config.auth_jwt_secret),
        webhooks: Arc::new(webhooks),
        push,
    };

    let app = routes::router(state, &config.cors_allowed_origins);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
