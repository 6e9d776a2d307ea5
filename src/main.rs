use account_store::data::postgres::PostgresAccountRepository;
use account_store::domain::repository::AccountRepository;
use account_store::infrastructure::config::AppConfig;
use account_store::infrastructure::database::connect;
use account_store::infrastructure::logging::init_logging;
use anyhow::{Context, Result};
use tracing::{info, instrument};

#[tokio::main]
#[instrument]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    init_logging(&config.log_filter);
    info!(config = ?config.database, "Configuration loaded");

    let pool = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let store = PostgresAccountRepository::new(pool);

    info!(seed_policy = %config.seed_policy, "Initializing demo schema");
    let report = store
        .init(config.seed_policy)
        .await
        .context("Failed to initialize demo schema")?;
    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "Demo schema initialized"
    );

    let accounts = store
        .get_accounts()
        .await
        .context("Failed to list accounts")?;
    info!(count = accounts.len(), "Account store ready");

    Ok(())
}
