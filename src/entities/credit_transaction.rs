//! Credit transaction entity - Represents a sale or purchase made on credit.
//!
//! Each transaction carries an immutable `total_usd` and an immutable
//! `exchange_rate_snapshot` fixed at creation time; every later currency
//! conversion that belongs to this transaction uses that snapshot. The ledger
//! never mutates a transaction except to flip the denormalized `is_paid` flag
//! once its account reaches the paid status.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Credit transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Which side of the ledger this belongs to: `"receivable"` (customer
    /// credit) or `"payable"` (supplier credit)
    pub side: String,
    /// Immutable USD total owed for this transaction
    pub total_usd: f64,
    /// Exchange rate fixed at creation time, used for all later conversions.
    /// None means the configured default rate applies.
    pub exchange_rate_snapshot: Option<f64>,
    /// Display name of the customer or supplier
    pub counterparty_name: String,
    /// Email address (or equivalent) used for reminders, if known
    pub counterparty_contact: Option<String>,
    /// Denormalized convenience flag, flipped by the ledger on PAID
    pub is_paid: bool,
    /// When the transaction was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between CreditTransaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction has at most one ledger account
    #[sea_orm(has_many = "super::ledger_account::Entity")]
    LedgerAccounts,
}

impl Related<super::ledger_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
