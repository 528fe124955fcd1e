//! Overdue reminder sweep - the periodic batch job over open accounts.
//!
//! Scans every pending/partial account, computes its age, and notifies the
//! counterparty of anything past the overdue threshold (the edge of the
//! coarse financial table's first rung, 30 days, by default). Accounts are
//! processed independently: a missing contact, a renderer error, or a
//! notifier failure is logged and skipped, never aborting the run. The first time an account crosses the threshold, one
//! `overdue_notified` event is appended as an idempotency marker; later
//! sweeps still re-send by default (`resend_every_run`), mirroring observed
//! production behavior.

use crate::{
    config::settings::SweepSettings,
    core::{account, aging, balance, events},
    entities::{
        CreditTransaction, LedgerAccount, credit_transaction, ledger_account,
    },
    errors::{Error, Result},
    notify::{Notifier, StatementRenderer},
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{info, warn};

/// Aggregate counters returned by a sweep run, for operator observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Overdue accounts the sweep attempted to notify
    pub attempted: u64,
    /// Reminders successfully handed to the notifier
    pub sent: u64,
    /// Accounts tagged as overdue-notified for the first time
    pub tagged: u64,
}

/// Runs the overdue sweep as of `today`.
///
/// `settings.overdue_after_days` sets the threshold (age must exceed it),
/// `settings.resend_every_run` controls whether already-tagged accounts are
/// reminded again, and `settings.max_accounts` caps a single run.
pub async fn run_overdue_sweep(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    renderer: &dyn StatementRenderer,
    settings: &SweepSettings,
    today: NaiveDate,
) -> Result<SweepOutcome> {
    let open_accounts = LedgerAccount::find()
        .filter(ledger_account::Column::Status.is_in(["pending", "partial"]))
        .all(db)
        .await?;

    let cap = settings.max_accounts.unwrap_or(u64::MAX);

    let mut outcome = SweepOutcome::default();

    for account in open_accounts {
        if outcome.attempted >= cap {
            info!(cap, "sweep reached max_accounts cap, stopping early");
            break;
        }

        let transaction = match CreditTransaction::find_by_id(account.transaction_id).one(db).await
        {
            Ok(Some(tx)) => tx,
            Ok(None) => {
                warn!(account_id = account.id, "account without transaction, skipping");
                continue;
            }
            Err(e) => {
                warn!(account_id = account.id, error = %e, "failed to load transaction, skipping");
                continue;
            }
        };

        let age = aging::age_in_days(aging::reference_date(&account, &transaction), today);
        if age <= settings.overdue_after_days {
            continue;
        }

        outcome.attempted += 1;

        match notify_account(db, notifier, renderer, &account, &transaction, settings, today)
            .await
        {
            Ok((sent, tagged)) => {
                outcome.sent += u64::from(sent);
                outcome.tagged += u64::from(tagged);
            }
            Err(e) => {
                warn!(account_id = account.id, error = %e, "sweep failed for account, continuing");
            }
        }
    }

    info!(
        attempted = outcome.attempted,
        sent = outcome.sent,
        tagged = outcome.tagged,
        "overdue sweep finished"
    );
    Ok(outcome)
}

/// Processes one overdue account. Returns (sent, newly tagged).
async fn notify_account(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    renderer: &dyn StatementRenderer,
    account: &ledger_account::Model,
    transaction: &credit_transaction::Model,
    settings: &SweepSettings,
    today: NaiveDate,
) -> Result<(bool, bool)> {
    let already_tagged = events::has_event(db, account.id, events::kind::OVERDUE_NOTIFIED).await?;

    let mut sent = false;
    if !already_tagged || settings.resend_every_run {
        if let Some(contact) = &transaction.counterparty_contact {
            let (subject, body, attachment) =
                build_reminder(db, account, transaction, renderer).await?;
            match notifier.send(contact, &subject, &body, attachment.as_deref()) {
                Ok(()) => {
                    sent = true;
                    events::append_event(
                        db,
                        account.id,
                        events::kind::REMINDER_SENT,
                        "system",
                        &format!("overdue reminder to {contact}"),
                    )
                    .await;
                }
                Err(e) => {
                    warn!(account_id = account.id, error = %e, "notifier failed, skipping");
                }
            }
        } else {
            warn!(
                account_id = account.id,
                "counterparty has no contact, skipping send"
            );
        }
    }

    // Tagging marks the first threshold crossing and is independent of
    // whether the send itself landed.
    let mut tagged = false;
    if !already_tagged {
        tagged = events::append_event(
            db,
            account.id,
            events::kind::OVERDUE_NOTIFIED,
            "system",
            &today.to_string(),
        )
        .await;
    }

    Ok((sent, tagged))
}

/// Builds the reminder payload shared by the sweep and on-demand sends.
/// Statement rendering is best-effort: a renderer failure drops the
/// attachment but never the reminder.
async fn build_reminder(
    db: &DatabaseConnection,
    account: &ledger_account::Model,
    transaction: &credit_transaction::Model,
    renderer: &dyn StatementRenderer,
) -> Result<(String, String, Option<Vec<u8>>)> {
    let position = balance::load_position(db, account).await?;
    let entries = account::get_entries_for_account(db, account.id).await?;

    let subject = format!("Payment reminder - credit transaction #{}", transaction.id);
    let body = format!(
        "Dear {},\n\nOur records show an outstanding balance of ${:.2} USD \
         on credit transaction #{}. Please arrange payment at your earliest \
         convenience.\n",
        transaction.counterparty_name, position.balance, transaction.id
    );

    let attachment = match renderer.render(account, transaction, &entries) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(account_id = account.id, error = %e, "statement rendering failed, sending without attachment");
            None
        }
    };

    Ok((subject, body, attachment))
}

/// Sends a reminder for one account on demand, with the same payload shape
/// as the sweep. Unlike the sweep, failures surface to the caller.
pub async fn send_reminder_now(
    db: &DatabaseConnection,
    account_id: i64,
    notifier: &dyn Notifier,
    renderer: &dyn StatementRenderer,
    actor: &str,
) -> Result<()> {
    let account = LedgerAccount::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;
    let transaction = CreditTransaction::find_by_id(account.transaction_id)
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound {
            id: account.transaction_id,
        })?;

    let contact =
        transaction
            .counterparty_contact
            .clone()
            .ok_or_else(|| Error::InvalidInput {
                message: format!("counterparty of transaction {} has no contact", transaction.id),
            })?;

    let (subject, body, attachment) = build_reminder(db, &account, &transaction, renderer).await?;
    notifier
        .send(&contact, &subject, &body, attachment.as_deref())
        .map_err(|e| Error::Dependency {
            message: e.to_string(),
        })?;

    events::append_event(
        db,
        account_id,
        events::kind::REMINDER_SENT,
        actor,
        &format!("on-demand reminder to {contact}"),
    )
    .await;

    Ok(())
}
