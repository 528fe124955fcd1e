//! Reporting projections - read-side views over accounts, entries, and notes.
//!
//! These are derived views only: aging aggregation for either threshold
//! table, and per-status totals. Nothing here mutates ledger state.

use crate::{
    core::{aging, balance},
    entities::{CreditTransaction, LedgerAccount, ledger_account},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::collections::HashMap;
use tracing::warn;

/// One row of an aging report: a bucket with its account count and total
/// outstanding balance.
#[derive(Debug, Clone, PartialEq)]
pub struct AgingBucketRow {
    /// Bucket label from the policy's threshold table
    pub label: String,
    /// Number of open accounts in the bucket
    pub count: u64,
    /// Summed outstanding balance of those accounts
    pub balance_usd: f64,
}

/// One row of the per-status totals report.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTotalRow {
    /// Account status string
    pub status: String,
    /// Number of accounts in this status
    pub count: u64,
    /// Summed outstanding balance of those accounts
    pub balance_usd: f64,
}

/// Aggregates open (pending/partial) accounts into the buckets of the given
/// aging policy as of `today`. Pass `side` to restrict the report to the
/// receivable or payable ledger.
///
/// Rows come back in the policy's bucket order, including empty buckets, so
/// report layouts stay stable.
pub async fn aging_report(
    db: &DatabaseConnection,
    policy: &aging::AgingPolicy,
    today: NaiveDate,
    side: Option<&str>,
) -> Result<Vec<AgingBucketRow>> {
    let open_accounts = LedgerAccount::find()
        .filter(ledger_account::Column::Status.is_in(["pending", "partial"]))
        .all(db)
        .await?;

    let mut counts: HashMap<String, (u64, f64)> = HashMap::new();
    for account in open_accounts {
        let Some(transaction) = CreditTransaction::find_by_id(account.transaction_id)
            .one(db)
            .await?
        else {
            warn!(account_id = account.id, "account without transaction, skipping");
            continue;
        };
        if let Some(side) = side {
            if transaction.side != side {
                continue;
            }
        }

        let position = balance::load_position(db, &account).await?;
        let label = aging::bucket_for_account(policy, &account, &transaction, today);
        let slot = counts.entry(label.to_string()).or_insert((0, 0.0));
        slot.0 += 1;
        slot.1 += position.balance;
    }

    Ok(policy
        .labels()
        .into_iter()
        .map(|label| {
            let (count, balance_usd) = counts.get(label).copied().unwrap_or((0, 0.0));
            AgingBucketRow {
                label: label.to_string(),
                count,
                balance_usd,
            }
        })
        .collect())
}

/// Totals per account status across the whole ledger, in lifecycle order.
pub async fn status_totals(db: &DatabaseConnection) -> Result<Vec<StatusTotalRow>> {
    let accounts = LedgerAccount::find().all(db).await?;

    let mut totals: HashMap<String, (u64, f64)> = HashMap::new();
    for account in accounts {
        let position = balance::load_position(db, &account).await?;
        let slot = totals.entry(account.status.clone()).or_insert((0, 0.0));
        slot.0 += 1;
        slot.1 += position.balance;
    }

    Ok(["pending", "partial", "paid", "cancelled"]
        .into_iter()
        .map(|status| {
            let (count, balance_usd) = totals.get(status).copied().unwrap_or((0, 0.0));
            StatusTotalRow {
                status: status.to_string(),
                count,
                balance_usd,
            }
        })
        .collect())
}
