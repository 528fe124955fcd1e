//! External notification and statement-rendering seams.
//!
//! The ledger treats outbound email/WhatsApp delivery and statement (PDF)
//! rendering as black boxes behind these traits. Failures are reported with
//! [`DependencyError`] and are always non-fatal to the ledger mutation that
//! triggered them. The logging implementations below back the batch binary
//! and tests; real delivery backends live outside this crate.

use crate::entities::{CreditTransactionModel, LedgerAccountModel, LedgerEntryModel};
use std::fmt::Write as _;
use tracing::info;

/// Failure reported by a notifier or renderer backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyError {
    /// Human-readable failure description
    pub message: String,
}

impl std::fmt::Display for DependencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DependencyError {}

/// Renders an account statement into an opaque document (PDF or equivalent).
pub trait StatementRenderer: Send + Sync {
    /// Renders a statement for the given account and its payment history.
    fn render(
        &self,
        account: &LedgerAccountModel,
        transaction: &CreditTransactionModel,
        entries: &[LedgerEntryModel],
    ) -> Result<Vec<u8>, DependencyError>;
}

/// Delivers a notification to a counterparty.
pub trait Notifier: Send + Sync {
    /// Sends a message, optionally with a rendered statement attached.
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<&[u8]>,
    ) -> Result<(), DependencyError>;
}

/// Notifier that logs instead of delivering. Used by the batch binary when no
/// real backend is wired up, and by tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn send(
        &self,
        to: &str,
        subject: &str,
        _body: &str,
        attachment: Option<&[u8]>,
    ) -> Result<(), DependencyError> {
        info!(
            to,
            subject,
            attachment_bytes = attachment.map_or(0, <[u8]>::len),
            "notification sent"
        );
        Ok(())
    }
}

/// Plain-text statement renderer used as the default rendering backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextStatementRenderer;

impl StatementRenderer for TextStatementRenderer {
    fn render(
        &self,
        account: &LedgerAccountModel,
        transaction: &CreditTransactionModel,
        entries: &[LedgerEntryModel],
    ) -> Result<Vec<u8>, DependencyError> {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Statement for {} (account #{})",
            transaction.counterparty_name, account.id
        );
        let _ = writeln!(out, "Total: ${:.2} USD", transaction.total_usd);
        for entry in entries {
            let _ = writeln!(
                out,
                "  {}  ${:.2} ({})",
                entry.occurred_at.format("%Y-%m-%d"),
                entry.amount_usd,
                entry.currency
            );
        }
        Ok(out.into_bytes())
    }
}
