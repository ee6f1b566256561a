use anyhow::Context;
use clap::Parser;
use seeder::{CatalogFile, CatalogSeeder, CatalogValidator};
use std::path::PathBuf;
use storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "workout-seed")]
#[command(about = "Loads the global exercise catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalog JSON file
    #[arg(default_value = "crates/seeder/data/exercises.json")]
    file: PathBuf,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long)]
    validate_only: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("workout_seed={},seeder={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Loading catalog from: {}", cli.file.display());

    let json_content = tokio::fs::read_to_string(&cli.file)
        .await
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let catalog: CatalogFile = serde_json::from_str(&json_content)?;

    tracing::info!(
        "Loaded {} exercises (v{})",
        catalog.exercises.len(),
        catalog.format_version
    );

    let report = CatalogValidator::validate(&catalog)?;
    report.log_warnings();
    tracing::info!("Validation successful");

    if cli.validate_only {
        return Ok(());
    }

    let database_url = cli
        .database_url
        .context("DATABASE_URL is required unless --validate-only is set")?;

    tracing::info!("Connecting to database...");
    let db = Database::new(&database_url)
        .await
        .context("Failed to initialize database")?;
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;

    let summary = CatalogSeeder::new(db.pool()).seed(&catalog).await?;

    tracing::info!(
        "Seeding completed: {} inserted, {} updated",
        summary.inserted,
        summary.updated
    );

    Ok(())
}
