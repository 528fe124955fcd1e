//! Core business logic for the billing ledger.
//!
//! Framework-agnostic operations over the entity layer: balance and status
//! derivation, account lifecycle, credit/debit adjustments, aging
//! classification, the overdue reminder sweep, and the deletion gate.

/// Ledger account lifecycle: creation, payments, entry edit/delete, overrides
pub mod account;
/// Credit/debit note adjustments
pub mod adjustment;
/// Aging classification policies and bucket computation
pub mod aging;
/// Pure balance and status derivation
pub mod balance;
/// Append-only audit/idempotency event log
pub mod events;
/// Secret-gated authorization for destructive deletions
pub mod gate;
/// Multi-currency normalization against a transaction's rate snapshot
pub mod money;
/// Read-side reporting projections
pub mod report;
/// Overdue reminder batch sweep
pub mod sweep;
