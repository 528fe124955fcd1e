/// Database connection and table creation
pub mod database;

/// Application settings loading from ledger.toml and environment variables
pub mod settings;

pub use settings::AppConfig;
