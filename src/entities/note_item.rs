//! Note item entity - A credit or debit adjustment on a ledger account.
//!
//! A `"credito"` note reduces the effective total owed (goodwill discount,
//! return); a `"debito"` note increases it (added fee). Both feed into the
//! balance and aging computations wherever present.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Note item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "note_items")]
pub struct Model {
    /// Unique identifier for the note item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the ledger account this note adjusts
    pub account_id: i64,
    /// Adjustment kind: `"credito"` (reduces owed) or `"debito"` (increases owed)
    pub kind: String,
    /// USD amount of the adjustment
    pub amount_usd: f64,
    /// Human-readable reason for the adjustment
    pub description: Option<String>,
    /// When the note was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between NoteItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each note item belongs to one ledger account
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
