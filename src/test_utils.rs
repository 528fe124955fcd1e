//! Shared test utilities for the billing ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::account::{self, PaymentInput, PaymentRecorded},
    entities::{credit_transaction, ledger_account},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Exchange rate used by tests when a transaction carries no snapshot.
pub const TEST_DEFAULT_RATE: f64 = 40.0;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test credit transaction with sensible defaults.
///
/// # Defaults
/// * `side`: "receivable"
/// * `exchange_rate_snapshot`: None (the configured default rate applies)
/// * `counterparty_contact`: `Some("customer@example.com")`
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    total_usd: f64,
) -> Result<credit_transaction::Model> {
    create_custom_transaction(
        db,
        "receivable",
        total_usd,
        None,
        Some("customer@example.com"),
    )
    .await
}

/// Creates a test credit transaction with custom parameters.
/// Use this when you need a payable-side transaction, a fixed rate snapshot,
/// or a missing counterparty contact.
pub async fn create_custom_transaction(
    db: &DatabaseConnection,
    side: &str,
    total_usd: f64,
    exchange_rate_snapshot: Option<f64>,
    counterparty_contact: Option<&str>,
) -> Result<credit_transaction::Model> {
    let transaction = credit_transaction::ActiveModel {
        side: Set(side.to_string()),
        total_usd: Set(total_usd),
        exchange_rate_snapshot: Set(exchange_rate_snapshot),
        counterparty_name: Set("Test Customer".to_string()),
        counterparty_contact: Set(counterparty_contact.map(ToString::to_string)),
        is_paid: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    transaction.insert(db).await.map_err(Into::into)
}

/// Records a USD test payment with default metadata.
pub async fn record_test_payment(
    db: &DatabaseConnection,
    account_id: i64,
    amount: f64,
) -> Result<PaymentRecorded> {
    account::record_payment(
        db,
        account_id,
        PaymentInput::new(amount, "USD", "test_user"),
        TEST_DEFAULT_RATE,
    )
    .await
}

/// Sets up a complete test environment with a $300 receivable and its account.
/// Returns (db, transaction, account) for common test scenarios.
pub async fn setup_with_account() -> Result<(
    DatabaseConnection,
    credit_transaction::Model,
    ledger_account::Model,
)> {
    let db = setup_test_db().await?;
    let transaction = create_test_transaction(&db, 300.0).await?;
    let account = account::ensure_account(&db, transaction.id).await?;
    Ok((db, transaction, account))
}
