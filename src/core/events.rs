//! Append-only account event log: audit trail plus idempotency markers.
//!
//! Every status-affecting mutation appends an event here. Appends are
//! best-effort by policy: a failed audit write is logged and never fails the
//! mutation it describes, which is why [`append_event`] returns a bool
//! instead of a `Result`. The overdue sweep uses the `overdue_notified` kind
//! as its first-notification marker.

use crate::entities::{AccountEvent, account_event};
use crate::errors::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set};
use tracing::warn;

/// Well-known event kinds.
pub mod kind {
    /// A payment entry was recorded
    pub const PAYMENT_RECORDED: &str = "payment_recorded";
    /// A payment entry was edited
    pub const ENTRY_EDITED: &str = "entry_edited";
    /// A payment entry was deleted through the gate
    pub const ENTRY_DELETED: &str = "entry_deleted";
    /// A credit/debit note was added
    pub const NOTE_ADDED: &str = "note_added";
    /// The due date was changed
    pub const DUE_DATE_CHANGED: &str = "due_date_changed";
    /// The account was force-marked paid (manual write-off)
    pub const MARKED_PAID: &str = "marked_paid";
    /// The account was administratively cancelled
    pub const CANCELLED: &str = "cancelled";
    /// A reminder was sent to the counterparty
    pub const REMINDER_SENT: &str = "reminder_sent";
    /// First time the account crossed the overdue threshold
    pub const OVERDUE_NOTIFIED: &str = "overdue_notified";
}

/// Appends an event, best-effort. Returns whether the write landed.
pub async fn append_event<C: ConnectionTrait>(
    conn: &C,
    account_id: i64,
    event_kind: &str,
    actor: &str,
    detail: &str,
) -> bool {
    let event = account_event::ActiveModel {
        account_id: Set(account_id),
        kind: Set(event_kind.to_string()),
        actor: Set(actor.to_string()),
        detail: Set(detail.to_string()),
        occurred_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match event.insert(conn).await {
        Ok(_) => true,
        Err(e) => {
            warn!(account_id, kind = event_kind, error = %e, "failed to append account event");
            false
        }
    }
}

/// Whether at least one event of the given kind exists for the account.
pub async fn has_event<C: ConnectionTrait>(
    conn: &C,
    account_id: i64,
    event_kind: &str,
) -> Result<bool> {
    let found = AccountEvent::find()
        .filter(account_event::Column::AccountId.eq(account_id))
        .filter(account_event::Column::Kind.eq(event_kind))
        .one(conn)
        .await?;
    Ok(found.is_some())
}

/// All events for an account, newest first.
pub async fn events_for_account(
    db: &sea_orm::DatabaseConnection,
    account_id: i64,
) -> Result<Vec<account_event::Model>> {
    AccountEvent::find()
        .filter(account_event::Column::AccountId.eq(account_id))
        .order_by_desc(account_event::Column::OccurredAt)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use crate::errors::Result;

    #[tokio::test]
    async fn test_append_and_query_events() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(!has_event(&db, 1, kind::OVERDUE_NOTIFIED).await?);

        assert!(append_event(&db, 1, kind::OVERDUE_NOTIFIED, "system", "2026-08-25").await);
        assert!(append_event(&db, 1, kind::REMINDER_SENT, "system", "first reminder").await);

        assert!(has_event(&db, 1, kind::OVERDUE_NOTIFIED).await?);
        assert!(!has_event(&db, 2, kind::OVERDUE_NOTIFIED).await?);

        let events = events_for_account(&db, 1).await?;
        assert_eq!(events.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_append_is_best_effort_on_broken_connection() {
        // No tables created: the insert fails, append reports false instead
        // of propagating the error.
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        assert!(!append_event(&db, 1, kind::PAYMENT_RECORDED, "admin", "x").await);
    }
}
