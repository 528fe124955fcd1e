//! Unified error types for the billing ledger.
//!
//! Mutating operations fail fast with one of these variants and never
//! partially apply. Dependency failures (notifier, statement renderer) are
//! non-fatal to the ledger mutation that triggered them: they are caught at
//! the call site, logged, and only visible through sweep counters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Amount must be positive: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Ledger account not found: {id}")]
    AccountNotFound { id: i64 },

    #[error("Ledger entry not found: {id}")]
    EntryNotFound { id: i64 },

    #[error("Credit transaction not found: {id}")]
    TransactionNotFound { id: i64 },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Dependency failure: {message}")]
    Dependency { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
