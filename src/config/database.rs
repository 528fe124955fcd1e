//! Database configuration module for the billing ledger.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. It uses `Schema::create_table_from_entity` to generate SQL from
//! the entity definitions, so the schema always matches the Rust structs
//! without requiring manual SQL.

use crate::entities::{AccountEvent, CreditTransaction, LedgerAccount, LedgerEntry, NoteItem};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database named by `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all ledger tables using `SeaORM`'s schema generation from entity
/// definitions.
///
/// Creates tables for credit transactions, ledger accounts, entries, note
/// items, and account events. Idempotent: existing tables are left alone.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut transaction_table = schema.create_table_from_entity(CreditTransaction);
    let mut account_table = schema.create_table_from_entity(LedgerAccount);
    let mut entry_table = schema.create_table_from_entity(LedgerEntry);
    let mut note_table = schema.create_table_from_entity(NoteItem);
    let mut event_table = schema.create_table_from_entity(AccountEvent);

    db.execute(builder.build(transaction_table.if_not_exists()))
        .await?;
    db.execute(builder.build(account_table.if_not_exists())).await?;
    db.execute(builder.build(entry_table.if_not_exists())).await?;
    db.execute(builder.build(note_table.if_not_exists())).await?;
    db.execute(builder.build(event_table.if_not_exists())).await?;

    Ok(())
}
