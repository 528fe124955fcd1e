//! Account event entity - Append-only audit and idempotency log per account.
//!
//! Replaces the source system's habit of stuffing `OVERDUE_NOTIFIED:` markers
//! into the free-text notes field. Every status-affecting mutation appends an
//! event here; the reminder sweep uses the `overdue_notified` kind to tag the
//! first overdue notification exactly once. Writes are best-effort and never
//! fail the mutation they describe.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account_events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the ledger account this event describes
    pub account_id: i64,
    /// Event kind, e.g. `"payment_recorded"`, `"overdue_notified"`
    pub kind: String,
    /// Who performed the action ("system" for the batch sweep)
    pub actor: String,
    /// Free-form detail payload
    pub detail: String,
    /// When the event occurred
    pub occurred_at: DateTimeUtc,
}

/// Defines relationships between AccountEvent and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each event belongs to one ledger account
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
