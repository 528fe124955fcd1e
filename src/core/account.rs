//! Ledger account lifecycle - Handles all account-level mutations.
//!
//! This module provides the get-or-create account operation, payment
//! recording with multi-currency normalization, entry editing and
//! secret-gated deletion, the explicit mark-paid and cancel overrides, and
//! metadata updates. Every entry mutation recomputes the derived balance and
//! status inside the same database transaction, so concurrent readers never
//! observe a stale status. Audit events are appended best-effort and reported
//! separately from the core result.

use crate::{
    core::{
        balance::{self, AccountStatus},
        events,
        gate::DeletionGate,
        money,
    },
    entities::{
        CreditTransaction, LedgerAccount, LedgerEntry, ledger_account, ledger_entry,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, prelude::DateTimeUtc,
};

/// Input for recording or editing a payment entry.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    /// Raw amount in the currency the counterparty paid in
    pub amount: f64,
    /// Currency code, e.g. "USD" or "VES"
    pub currency: String,
    /// Payment method, if known
    pub method: Option<String>,
    /// External reference number, if known
    pub reference: Option<String>,
    /// Free-text notes for this payment
    pub notes: Option<String>,
    /// When the payment happened; defaults to now, back-datable
    pub occurred_at: Option<DateTimeUtc>,
    /// Who is recording the payment (for the audit trail)
    pub actor: String,
}

impl PaymentInput {
    /// Builds a payment input with no optional metadata.
    #[must_use]
    pub fn new(amount: f64, currency: &str, actor: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
            method: None,
            reference: None,
            notes: None,
            occurred_at: None,
            actor: actor.to_string(),
        }
    }
}

/// Result of recording or editing a payment: the core mutation outcome plus
/// the side-effect report, so callers and tests can assert on both
/// independently.
#[derive(Debug, Clone)]
pub struct PaymentRecorded {
    /// The inserted or updated entry
    pub entry: ledger_entry::Model,
    /// The account after recomputation
    pub account: ledger_account::Model,
    /// The derived status after recomputation
    pub status: AccountStatus,
    /// Whether the audit event write landed
    pub audit_logged: bool,
}

/// Result of a gated entry deletion.
#[derive(Debug, Clone)]
pub struct EntryDeleted {
    /// The account after recomputation
    pub account: ledger_account::Model,
    /// The derived status after recomputation
    pub status: AccountStatus,
    /// Whether the audit event write landed
    pub audit_logged: bool,
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Idempotent get-or-create: returns the one account tracking a transaction,
/// creating it lazily on first use.
///
/// The `transaction_id` column is unique, and lookup-and-insert runs inside a
/// database transaction, so exactly one account exists per credit
/// transaction.
pub async fn ensure_account(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<ledger_account::Model> {
    let txn = db.begin().await?;

    CreditTransaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    if let Some(existing) = LedgerAccount::find()
        .filter(ledger_account::Column::TransactionId.eq(transaction_id))
        .one(&txn)
        .await?
    {
        txn.commit().await?;
        return Ok(existing);
    }

    let account = ledger_account::ActiveModel {
        transaction_id: Set(transaction_id),
        status: Set(AccountStatus::Pending.as_str().to_string()),
        due_date: Set(None),
        notes: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = account.insert(&txn).await?;

    txn.commit().await?;
    Ok(created)
}

/// Records a payment against an account.
///
/// The raw amount is normalized to USD with the owning transaction's rate
/// snapshot, the entry is appended, and balance/status are recomputed in the
/// same database transaction. Reaching the paid status flips the
/// transaction's denormalized `is_paid` flag; a payment never moves a paid
/// account backwards.
pub async fn record_payment(
    db: &DatabaseConnection,
    account_id: i64,
    input: PaymentInput,
    default_rate: f64,
) -> Result<PaymentRecorded> {
    validate_amount(input.amount)?;

    let txn = db.begin().await?;

    let account = LedgerAccount::find_by_id(account_id)
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;
    let transaction = CreditTransaction::find_by_id(account.transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::TransactionNotFound {
            id: account.transaction_id,
        })?;

    let amount_usd = money::normalize(input.amount, &input.currency, &transaction, default_rate);

    let entry = ledger_entry::ActiveModel {
        account_id: Set(account_id),
        amount_usd: Set(amount_usd),
        currency: Set(input.currency.clone()),
        method: Set(input.method),
        reference: Set(input.reference),
        notes: Set(input.notes),
        occurred_at: Set(input.occurred_at.unwrap_or_else(chrono::Utc::now)),
        ..Default::default()
    };
    let entry = entry.insert(&txn).await?;

    let (account, status) = balance::recompute_account(&txn, account_id, false).await?;

    let audit_logged = events::append_event(
        &txn,
        account_id,
        events::kind::PAYMENT_RECORDED,
        &input.actor,
        &format!(
            "{} {} -> ${amount_usd:.2} USD (entry {})",
            input.amount, input.currency, entry.id
        ),
    )
    .await;

    txn.commit().await?;

    Ok(PaymentRecorded {
        entry,
        account,
        status,
        audit_logged,
    })
}

/// Edits a payment entry and recomputes the owning account.
///
/// The amount is re-normalized against the owning transaction's snapshot.
/// Unlike payment recording, an edit may legitimately reopen a paid account.
pub async fn edit_entry(
    db: &DatabaseConnection,
    entry_id: i64,
    input: PaymentInput,
    default_rate: f64,
) -> Result<PaymentRecorded> {
    validate_amount(input.amount)?;

    let txn = db.begin().await?;

    let entry = LedgerEntry::find_by_id(entry_id)
        .one(&txn)
        .await?
        .ok_or(Error::EntryNotFound { id: entry_id })?;
    let account_id = entry.account_id;

    let account = LedgerAccount::find_by_id(account_id)
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;
    let transaction = CreditTransaction::find_by_id(account.transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::TransactionNotFound {
            id: account.transaction_id,
        })?;

    let amount_usd = money::normalize(input.amount, &input.currency, &transaction, default_rate);

    let mut active: ledger_entry::ActiveModel = entry.into();
    active.amount_usd = Set(amount_usd);
    active.currency = Set(input.currency.clone());
    active.method = Set(input.method);
    active.reference = Set(input.reference);
    active.notes = Set(input.notes);
    if let Some(occurred_at) = input.occurred_at {
        active.occurred_at = Set(occurred_at);
    }
    let entry = active.update(&txn).await?;

    let (account, status) = balance::recompute_account(&txn, account_id, true).await?;

    let audit_logged = events::append_event(
        &txn,
        account_id,
        events::kind::ENTRY_EDITED,
        &input.actor,
        &format!(
            "entry {} -> {} {} (${amount_usd:.2} USD)",
            entry.id, input.amount, input.currency
        ),
    )
    .await;

    txn.commit().await?;

    Ok(PaymentRecorded {
        entry,
        account,
        status,
        audit_logged,
    })
}

/// Deletes a payment entry after the deletion gate approves the supplied
/// secret, then recomputes the owning account.
pub async fn delete_entry(
    db: &DatabaseConnection,
    entry_id: i64,
    secret: &str,
    gate: &DeletionGate,
    actor: &str,
) -> Result<EntryDeleted> {
    gate.require(secret)?;

    let txn = db.begin().await?;

    let entry = LedgerEntry::find_by_id(entry_id)
        .one(&txn)
        .await?
        .ok_or(Error::EntryNotFound { id: entry_id })?;
    let account_id = entry.account_id;
    let deleted_amount = entry.amount_usd;

    LedgerEntry::delete_by_id(entry_id).exec(&txn).await?;

    let (account, status) = balance::recompute_account(&txn, account_id, true).await?;

    let audit_logged = events::append_event(
        &txn,
        account_id,
        events::kind::ENTRY_DELETED,
        actor,
        &format!("entry {entry_id} (${deleted_amount:.2} USD) removed"),
    )
    .await;

    txn.commit().await?;

    Ok(EntryDeleted {
        account,
        status,
        audit_logged,
    })
}

/// Forces an account to the paid status without requiring the balance to
/// reach zero (manual write-off).
///
/// The audit event carries a manual-override detail so this transition stays
/// distinguishable from the invariant-driven one.
pub async fn mark_paid_override(
    db: &DatabaseConnection,
    account_id: i64,
    actor: &str,
) -> Result<ledger_account::Model> {
    let txn = db.begin().await?;

    let account = LedgerAccount::find_by_id(account_id)
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    let transaction_id = account.transaction_id;
    let mut active: ledger_account::ActiveModel = account.into();
    active.status = Set(AccountStatus::Paid.as_str().to_string());
    let updated = active.update(&txn).await?;

    balance::sync_paid_flag(&txn, transaction_id, true).await?;

    events::append_event(
        &txn,
        account_id,
        events::kind::MARKED_PAID,
        actor,
        "manual override, balance not settled by entries",
    )
    .await;

    txn.commit().await?;
    Ok(updated)
}

/// Administratively cancels an account. The only path to the cancelled
/// status; recomputation will preserve it afterwards.
pub async fn cancel_account(
    db: &DatabaseConnection,
    account_id: i64,
    actor: &str,
) -> Result<ledger_account::Model> {
    let txn = db.begin().await?;

    let account = LedgerAccount::find_by_id(account_id)
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    let mut active: ledger_account::ActiveModel = account.into();
    active.status = Set(AccountStatus::Cancelled.as_str().to_string());
    let updated = active.update(&txn).await?;

    events::append_event(
        &txn,
        account_id,
        events::kind::CANCELLED,
        actor,
        "administrative cancellation",
    )
    .await;

    txn.commit().await?;
    Ok(updated)
}

/// Sets or clears the due date. Metadata only: the balance is unaffected, so
/// no recomputation runs; only aging sees the change.
pub async fn set_due_date(
    db: &DatabaseConnection,
    account_id: i64,
    due_date: Option<NaiveDate>,
    actor: &str,
) -> Result<ledger_account::Model> {
    let account = LedgerAccount::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    let mut active: ledger_account::ActiveModel = account.into();
    active.due_date = Set(due_date);
    let updated = active.update(db).await?;

    events::append_event(
        db,
        account_id,
        events::kind::DUE_DATE_CHANGED,
        actor,
        &due_date.map_or_else(|| "cleared".to_string(), |d| d.to_string()),
    )
    .await;

    Ok(updated)
}

/// Overwrites the free-text administrative notes. Distinct from the
/// append-only event log: no audit event, no recomputation.
pub async fn set_notes(
    db: &DatabaseConnection,
    account_id: i64,
    text: String,
) -> Result<ledger_account::Model> {
    let account = LedgerAccount::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    let mut active: ledger_account::ActiveModel = account.into();
    active.notes = Set(Some(text));
    active.update(db).await.map_err(Into::into)
}

/// Finds an account by its unique ID.
pub async fn get_account_by_id(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<ledger_account::Model>> {
    LedgerAccount::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the account tracking a given credit transaction, if one exists yet.
pub async fn get_account_by_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<ledger_account::Model>> {
    LedgerAccount::find()
        .filter(ledger_account::Column::TransactionId.eq(transaction_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all payment entries for an account, newest first.
pub async fn get_entries_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<ledger_entry::Model>> {
    LedgerEntry::find()
        .filter(ledger_entry::Column::AccountId.eq(account_id))
        .order_by_desc(ledger_entry::Column::OccurredAt)
        .all(db)
        .await
        .map_err(Into::into)
}
