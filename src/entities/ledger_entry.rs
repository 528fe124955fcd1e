//! Ledger entry entity - Represents one payment applied against an account.
//!
//! `amount_usd` is normalized once at creation using the owning transaction's
//! exchange rate snapshot and is never recomputed afterwards. The original
//! `currency` the counterparty paid in is kept for display and audit.
//! `occurred_at` is user-settable so a payment can be back-dated to the day it
//! actually happened.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the ledger account this entry belongs to
    pub account_id: i64,
    /// USD amount, normalized at creation with the transaction's rate snapshot
    pub amount_usd: f64,
    /// Currency the counterparty actually paid in (e.g. `"USD"`, `"VES"`)
    pub currency: String,
    /// Payment method (e.g. "transfer", "cash"), if recorded
    pub method: Option<String>,
    /// External reference number, if recorded
    pub reference: Option<String>,
    /// Free-text notes about this payment
    pub notes: Option<String>,
    /// When the payment happened (back-datable by the caller)
    pub occurred_at: DateTimeUtc,
}

/// Defines relationships between LedgerEntry and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one ledger account
    #[sea_orm(
        belongs_to = "super::ledger_account::Entity",
        from = "Column::AccountId",
        to = "super::ledger_account::Column::Id"
    )]
    LedgerAccount,
}

impl Related<super::ledger_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
