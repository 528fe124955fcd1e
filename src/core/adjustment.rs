//! Credit/debit note adjustments.
//!
//! A note item changes the effective total owed on an account without
//! touching its payment entries: a credit note (goodwill discount, return)
//! reduces it, a debit note (added fee) increases it. Adding a note
//! recomputes balance and status in the same database transaction.

use crate::{
    core::{balance, events},
    entities::{LedgerAccount, NoteItem, note_item},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// The kind of adjustment a note item applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    /// Reduces the effective total owed
    Credito,
    /// Increases the effective total owed
    Debito,
}

impl NoteKind {
    /// The string stored in the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credito => "credito",
            Self::Debito => "debito",
        }
    }
}

/// Outcome of adding a note: the note plus the recomputed account state.
#[derive(Debug, Clone)]
pub struct NoteAdded {
    /// The inserted note item
    pub note: note_item::Model,
    /// The account after recomputation
    pub account: crate::entities::ledger_account::Model,
    /// The derived status after recomputation
    pub status: balance::AccountStatus,
    /// Whether the audit event write landed
    pub audit_logged: bool,
}

/// Appends a credit or debit note to an account and recomputes it.
pub async fn add_note_item(
    db: &DatabaseConnection,
    account_id: i64,
    kind: NoteKind,
    amount_usd: f64,
    description: Option<String>,
    actor: &str,
) -> Result<NoteAdded> {
    if amount_usd <= 0.0 || !amount_usd.is_finite() {
        return Err(Error::InvalidAmount { amount: amount_usd });
    }

    let txn = db.begin().await?;

    LedgerAccount::find_by_id(account_id)
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    let note = note_item::ActiveModel {
        account_id: Set(account_id),
        kind: Set(kind.as_str().to_string()),
        amount_usd: Set(amount_usd),
        description: Set(description),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let note = note.insert(&txn).await?;

    let (account, status) = balance::recompute_account(&txn, account_id, true).await?;

    let audit_logged = events::append_event(
        &txn,
        account_id,
        events::kind::NOTE_ADDED,
        actor,
        &format!("{} ${amount_usd:.2} USD", kind.as_str()),
    )
    .await;

    txn.commit().await?;

    Ok(NoteAdded {
        note,
        account,
        status,
        audit_logged,
    })
}

/// Retrieves all note items for an account, oldest first.
pub async fn get_notes_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<note_item::Model>> {
    NoteItem::find()
        .filter(note_item::Column::AccountId.eq(account_id))
        .order_by_asc(note_item::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::account::ensure_account;
    use crate::core::balance::AccountStatus;
    use crate::test_utils::{create_test_transaction, record_test_payment, setup_test_db};

    #[tokio::test]
    async fn test_debit_note_raises_effective_total() -> Result<()> {
        // $200 total plus one debito of 20 -> effective 220;
        // payment of 220 settles the account.
        let db = setup_test_db().await?;
        let transaction = create_test_transaction(&db, 200.0).await?;
        let account = ensure_account(&db, transaction.id).await?;

        let added =
            add_note_item(&db, account.id, NoteKind::Debito, 20.0, None, "admin").await?;
        assert_eq!(added.status, AccountStatus::Pending);

        let partial = record_test_payment(&db, account.id, 200.0).await?;
        assert_eq!(partial.status, AccountStatus::Partial);

        let settled = record_test_payment(&db, account.id, 20.0).await?;
        assert_eq!(settled.status, AccountStatus::Paid);

        Ok(())
    }

    #[tokio::test]
    async fn test_credit_note_can_settle_account() -> Result<()> {
        let db = setup_test_db().await?;
        let transaction = create_test_transaction(&db, 100.0).await?;
        let account = ensure_account(&db, transaction.id).await?;

        record_test_payment(&db, account.id, 60.0).await?;
        let added = add_note_item(
            &db,
            account.id,
            NoteKind::Credito,
            40.0,
            Some("returned damaged goods".to_string()),
            "admin",
        )
        .await?;

        assert_eq!(added.status, AccountStatus::Paid);
        assert!(added.audit_logged);

        Ok(())
    }

    #[tokio::test]
    async fn test_note_validation_and_missing_account() -> Result<()> {
        let db = setup_test_db().await?;

        let result = add_note_item(&db, 1, NoteKind::Debito, 0.0, None, "admin").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let result = add_note_item(&db, 99, NoteKind::Debito, 5.0, None, "admin").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::AccountNotFound { id: 99 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_notes_for_account() -> Result<()> {
        let db = setup_test_db().await?;
        let transaction = create_test_transaction(&db, 100.0).await?;
        let account = ensure_account(&db, transaction.id).await?;

        add_note_item(&db, account.id, NoteKind::Debito, 5.0, None, "admin").await?;
        add_note_item(&db, account.id, NoteKind::Credito, 3.0, None, "admin").await?;

        let notes = get_notes_for_account(&db, account.id).await?;
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].kind, "debito");
        assert_eq!(notes[1].kind, "credito");

        Ok(())
    }
}
