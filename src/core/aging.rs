//! Aging classification - maps how overdue an account is to a bucket label.
//!
//! Two independent threshold tables are in use and deliberately not unified:
//! the fine-grained operational view the dispatch team works from, and the
//! coarse table used for financial reporting and the overdue sweep. Both are
//! configuration values; custom tables can be built with [`AgingPolicy::new`].

use crate::entities::{CreditTransactionModel, LedgerAccountModel};
use chrono::NaiveDate;

/// An ordered aging threshold table.
///
/// Ages at or below zero fall into `current_label` when the table has one,
/// otherwise into the first rung. Ages beyond the last rung get
/// `overflow_label`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgingPolicy {
    /// Label for accounts not yet due (age ≤ 0), if the table separates them
    pub current_label: Option<String>,
    /// Ordered (inclusive max age in days, label) rungs
    pub rungs: Vec<(i64, String)>,
    /// Label for ages beyond the last rung
    pub overflow_label: String,
}

impl AgingPolicy {
    /// Builds a custom policy from ordered rungs.
    #[must_use]
    pub fn new(
        current_label: Option<String>,
        rungs: Vec<(i64, String)>,
        overflow_label: String,
    ) -> Self {
        Self {
            current_label,
            rungs,
            overflow_label,
        }
    }

    /// Fine-grained operational table: 0-10, 11-20, 21-30, then OVERDUE.
    #[must_use]
    pub fn operational() -> Self {
        Self::new(
            None,
            vec![
                (10, "0-10 days".to_string()),
                (20, "11-20 days".to_string()),
                (30, "21-30 days".to_string()),
            ],
            "OVERDUE".to_string(),
        )
    }

    /// Coarse financial-reporting table: CURRENT, 1-30, 31-60, 61-90, >90.
    #[must_use]
    pub fn financial() -> Self {
        Self::new(
            Some("CURRENT".to_string()),
            vec![
                (30, "1-30 days".to_string()),
                (60, "31-60 days".to_string()),
                (90, "61-90 days".to_string()),
            ],
            ">90 days".to_string(),
        )
    }

    /// Classifies an age in days into this table's bucket label.
    ///
    /// Negative ages clamp to the current/not-yet-due bucket.
    #[must_use]
    pub fn bucket(&self, age_days: i64) -> &str {
        if age_days <= 0 {
            if let Some(current) = &self.current_label {
                return current;
            }
            if let Some((_, first)) = self.rungs.first() {
                return first;
            }
            return &self.overflow_label;
        }

        for (max_age, label) in &self.rungs {
            if age_days <= *max_age {
                return label;
            }
        }
        &self.overflow_label
    }

    /// All bucket labels in classification order, for report layout.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        if let Some(current) = &self.current_label {
            labels.push(current);
        }
        for (_, label) in &self.rungs {
            labels.push(label);
        }
        labels.push(&self.overflow_label);
        labels
    }
}

/// Whole days elapsed between the reference date and today.
#[must_use]
pub fn age_in_days(reference: NaiveDate, today: NaiveDate) -> i64 {
    (today - reference).num_days()
}

/// Aging reference date for an account: its due date when set, otherwise the
/// owning transaction's creation date.
#[must_use]
pub fn reference_date(
    account: &LedgerAccountModel,
    transaction: &CreditTransactionModel,
) -> NaiveDate {
    account
        .due_date
        .unwrap_or_else(|| transaction.created_at.date_naive())
}

/// Classifies an account against a policy as of `today`.
#[must_use]
pub fn bucket_for_account<'a>(
    policy: &'a AgingPolicy,
    account: &LedgerAccountModel,
    transaction: &CreditTransactionModel,
    today: NaiveDate,
) -> &'a str {
    let age = age_in_days(reference_date(account, transaction), today);
    policy.bucket(age)
}
