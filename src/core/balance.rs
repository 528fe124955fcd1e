//! Balance & status engine - pure derivation of an account's position.
//!
//! The invariant maintained after every entry/note mutation:
//!
//! ```text
//! effective_total = transaction.total_usd + Σ debito − Σ credito
//! balance         = max(0, effective_total − Σ entry.amount_usd)
//! status          = paid     if balance ≤ 0.01
//!                   partial  if 0 < balance < effective_total and ≥ 1 entry
//!                   pending  otherwise
//! ```
//!
//! `cancelled` is never derived: it is set only by explicit administrative
//! action, and recomputation preserves it.

use crate::entities::{
    CreditTransaction, LedgerAccount, LedgerEntryModel, NoteItemModel, ledger_account,
    ledger_entry, note_item,
};
use crate::errors::{Error, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

/// Balances at or below this are considered fully paid (absorbs float noise).
pub const PAID_TOLERANCE_USD: f64 = 0.01;

/// Derived lifecycle status of a ledger account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// No payments recorded yet
    Pending,
    /// Some payments recorded, balance still outstanding
    Partial,
    /// Balance settled (or manually written off)
    Paid,
    /// Administratively cancelled; never derived
    Cancelled,
}

impl AccountStatus {
    /// The string stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a stored status string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "partial" => Some(Self::Partial),
            "paid" => Some(Self::Paid),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Computed position of an account: totals and entry count in one place.
#[derive(Debug, Clone, Copy)]
pub struct AccountPosition {
    /// Transaction total adjusted by debit/credit notes
    pub effective_total: f64,
    /// Outstanding balance, clamped at zero
    pub balance: f64,
    /// Number of payment entries applied
    pub entry_count: usize,
}

/// Effective total owed: transaction total plus debit notes minus credit notes.
#[must_use]
pub fn effective_total(total_usd: f64, notes: &[NoteItemModel]) -> f64 {
    notes.iter().fold(total_usd, |acc, note| {
        if note.kind == "debito" {
            acc + note.amount_usd
        } else {
            acc - note.amount_usd
        }
    })
}

/// Outstanding balance after applying all entries, clamped at zero.
#[must_use]
pub fn balance(effective_total: f64, entries: &[LedgerEntryModel]) -> f64 {
    let paid: f64 = entries.iter().map(|e| e.amount_usd).sum();
    (effective_total - paid).max(0.0)
}

/// Derives the status from a computed position. Never produces `Cancelled`.
#[must_use]
pub fn derive_status(position: &AccountPosition) -> AccountStatus {
    if position.balance <= PAID_TOLERANCE_USD {
        AccountStatus::Paid
    } else if position.entry_count > 0 && position.balance < position.effective_total {
        AccountStatus::Partial
    } else {
        AccountStatus::Pending
    }
}

/// Loads an account's entries and notes and computes its position.
///
/// Works against a plain connection or an open database transaction, so
/// recomputation can run inside the same unit of work as the mutation that
/// triggered it.
pub async fn load_position<C: ConnectionTrait>(
    conn: &C,
    account: &ledger_account::Model,
) -> Result<AccountPosition> {
    let transaction = CreditTransaction::find_by_id(account.transaction_id)
        .one(conn)
        .await?
        .ok_or(Error::TransactionNotFound {
            id: account.transaction_id,
        })?;

    let entries = crate::entities::LedgerEntry::find()
        .filter(ledger_entry::Column::AccountId.eq(account.id))
        .all(conn)
        .await?;
    let notes = crate::entities::NoteItem::find()
        .filter(note_item::Column::AccountId.eq(account.id))
        .all(conn)
        .await?;

    let effective = effective_total(transaction.total_usd, &notes);
    Ok(AccountPosition {
        effective_total: effective,
        balance: balance(effective, &entries),
        entry_count: entries.len(),
    })
}

/// Recomputes and persists an account's derived status inside the caller's
/// unit of work, returning the refreshed model and status.
///
/// A `cancelled` account is left untouched. When `allow_downgrade` is false
/// (payment recording), a `paid` account never moves backwards even if a
/// manual write-off left a nominal balance; entry edits and deletions pass
/// true so corrections can reopen an account. The owning transaction's
/// denormalized `is_paid` flag is kept in sync with the resulting status.
pub async fn recompute_account<C: ConnectionTrait>(
    conn: &C,
    account_id: i64,
    allow_downgrade: bool,
) -> Result<(ledger_account::Model, AccountStatus)> {
    let account = LedgerAccount::find_by_id(account_id)
        .one(conn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    let current = AccountStatus::parse(&account.status).unwrap_or(AccountStatus::Pending);
    if current == AccountStatus::Cancelled {
        return Ok((account, AccountStatus::Cancelled));
    }

    let position = load_position(conn, &account).await?;
    let mut status = derive_status(&position);
    if !allow_downgrade && current == AccountStatus::Paid {
        status = AccountStatus::Paid;
    }

    let transaction_id = account.transaction_id;
    let mut active: ledger_account::ActiveModel = account.into();
    active.status = Set(status.as_str().to_string());
    let updated = active.update(conn).await?;

    sync_paid_flag(conn, transaction_id, status == AccountStatus::Paid).await?;

    Ok((updated, status))
}

/// Flips the transaction's denormalized `is_paid` flag to match the account.
pub(crate) async fn sync_paid_flag<C: ConnectionTrait>(
    conn: &C,
    transaction_id: i64,
    is_paid: bool,
) -> Result<()> {
    use crate::entities::credit_transaction;

    let transaction = CreditTransaction::find_by_id(transaction_id)
        .one(conn)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    if transaction.is_paid != is_paid {
        let mut active: credit_transaction::ActiveModel = transaction.into();
        active.is_paid = Set(is_paid);
        active.update(conn).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::Utc;

    fn entry(amount_usd: f64) -> LedgerEntryModel {
        LedgerEntryModel {
            id: 0,
            account_id: 1,
            amount_usd,
            currency: "USD".to_string(),
            method: None,
            reference: None,
            notes: None,
            occurred_at: Utc::now(),
        }
    }

    fn note(kind: &str, amount_usd: f64) -> NoteItemModel {
        NoteItemModel {
            id: 0,
            account_id: 1,
            kind: kind.to_string(),
            amount_usd,
            description: None,
            created_at: Utc::now(),
        }
    }

    fn position(effective: f64, bal: f64, entries: usize) -> AccountPosition {
        AccountPosition {
            effective_total: effective,
            balance: bal,
            entry_count: entries,
        }
    }

    #[test]
    fn test_effective_total_with_notes() {
        let notes = vec![note("debito", 20.0), note("credito", 5.0)];
        assert_eq!(effective_total(200.0, &notes), 215.0);
    }

    #[test]
    fn test_effective_total_no_notes() {
        assert_eq!(effective_total(300.0, &[]), 300.0);
    }

    #[test]
    fn test_balance_clamps_at_zero() {
        let entries = vec![entry(150.0), entry(200.0)];
        assert_eq!(balance(300.0, &entries), 0.0);
    }

    #[test]
    fn test_balance_partial() {
        let entries = vec![entry(100.0)];
        assert_eq!(balance(300.0, &entries), 200.0);
    }

    #[test]
    fn test_derive_status_pending_without_entries() {
        assert_eq!(
            derive_status(&position(300.0, 300.0, 0)),
            AccountStatus::Pending
        );
    }

    #[test]
    fn test_derive_status_partial() {
        assert_eq!(
            derive_status(&position(300.0, 100.0, 1)),
            AccountStatus::Partial
        );
    }

    #[test]
    fn test_derive_status_paid_within_tolerance() {
        assert_eq!(derive_status(&position(300.0, 0.0, 2)), AccountStatus::Paid);
        assert_eq!(
            derive_status(&position(300.0, 0.009, 2)),
            AccountStatus::Paid
        );
    }

    #[test]
    fn test_derive_status_just_above_tolerance_is_partial() {
        assert_eq!(
            derive_status(&position(300.0, 0.02, 1)),
            AccountStatus::Partial
        );
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            AccountStatus::Pending,
            AccountStatus::Partial,
            AccountStatus::Paid,
            AccountStatus::Cancelled,
        ] {
            assert_eq!(AccountStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AccountStatus::parse("bogus"), None);
    }

    #[test]
    fn test_recompute_from_scratch_matches_incremental() {
        // Applying entries one at a time must land on the same balance as a
        // single from-scratch computation over the full entry set.
        let notes = vec![note("debito", 50.0)];
        let all_entries = vec![entry(100.0), entry(75.5), entry(24.5)];
        let effective = effective_total(200.0, &notes);

        let from_scratch = balance(effective, &all_entries);

        let mut incremental = effective;
        for e in &all_entries {
            incremental = (incremental - e.amount_usd).max(0.0);
        }

        assert_eq!(from_scratch, incremental);
    }
}
