//! Ledger account entity - Tracks what is still owed against one credit transaction.
//!
//! Exactly one account exists per transaction (`transaction_id` is unique).
//! The `status` column is derived from entries and note items after every
//! mutation; it is never user-editable except through the explicit mark-paid
//! and cancel overrides. `notes` is a human-editable free-text field only:
//! idempotency markers and audit trails live in the `account_events` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The credit transaction this account tracks (one account per transaction)
    #[sea_orm(unique)]
    pub transaction_id: i64,
    /// Derived status: `"pending"`, `"partial"`, `"paid"`, or `"cancelled"`
    pub status: String,
    /// Optional due date; aging falls back to the transaction's creation date
    pub due_date: Option<Date>,
    /// Free-text administrative notes (not an audit channel)
    pub notes: Option<String>,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between LedgerAccount and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each account belongs to one credit transaction
    #[sea_orm(
        belongs_to = "super::credit_transaction::Entity",
        from = "Column::TransactionId",
        to = "super::credit_transaction::Column::Id"
    )]
    CreditTransaction,
    /// One account has many payment entries
    #[sea_orm(has_many = "super::ledger_entry::Entity")]
    LedgerEntries,
    /// One account has many credit/debit note items
    #[sea_orm(has_many = "super::note_item::Entity")]
    NoteItems,
    /// One account has many audit events
    #[sea_orm(has_many = "super::account_event::Entity")]
    AccountEvents,
}

impl Related<super::credit_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditTransaction.def()
    }
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl Related<super::note_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NoteItems.def()
    }
}

impl Related<super::account_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
