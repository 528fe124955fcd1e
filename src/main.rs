//! Batch entry point: runs the overdue reminder sweep against the configured
//! database and reports its counters.

use billing_ledger::config;
use billing_ledger::core::sweep;
use billing_ledger::errors::Result;
use billing_ledger::notify::{LoggingNotifier, TextStatementRenderer};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally

    // 3. Load the application configuration
    let app_config = config::settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;
    info!("Configuration loaded.");

    // 4. Initialize database
    let db = config::database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db).await?;

    // 5. Run the overdue sweep
    let outcome = sweep::run_overdue_sweep(
        &db,
        &LoggingNotifier,
        &TextStatementRenderer,
        &app_config.sweep,
        chrono::Utc::now().date_naive(),
    )
    .await
    .inspect_err(|e| error!("Overdue sweep failed: {e}"))?;

    info!(
        attempted = outcome.attempted,
        sent = outcome.sent,
        tagged = outcome.tagged,
        "Sweep complete."
    );

    Ok(())
}
