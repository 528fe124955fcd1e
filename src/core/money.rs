//! Money normalization against a transaction's exchange rate snapshot.
//!
//! Every amount stored in the ledger is USD-denominated. Conversions always
//! use the rate snapshot fixed when the owning credit transaction was
//! created, so two calls against the same transaction with the same raw
//! amount yield the same normalized value no matter how rates move elsewhere
//! in the system.

use crate::entities::CreditTransactionModel;

/// Converts an (amount, currency) pair to USD using the owning transaction's
/// rate snapshot.
///
/// USD amounts pass through unchanged. Any other currency is divided by the
/// transaction's `exchange_rate_snapshot`; transactions created without one
/// fall back to `default_rate` (configured, shipped default 40.0).
#[must_use]
pub fn normalize(
    amount: f64,
    currency: &str,
    transaction: &CreditTransactionModel,
    default_rate: f64,
) -> f64 {
    if currency.eq_ignore_ascii_case("USD") {
        return amount;
    }

    let rate = transaction.exchange_rate_snapshot.unwrap_or(default_rate);
    amount / rate
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::Utc;

    fn transaction_with_rate(rate: Option<f64>) -> CreditTransactionModel {
        CreditTransactionModel {
            id: 1,
            side: "receivable".to_string(),
            total_usd: 100.0,
            exchange_rate_snapshot: rate,
            counterparty_name: "Test Customer".to_string(),
            counterparty_contact: None,
            is_paid: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_usd_passes_through() {
        let tx = transaction_with_rate(Some(36.0));
        assert_eq!(normalize(250.0, "USD", &tx, 40.0), 250.0);
        assert_eq!(normalize(250.0, "usd", &tx, 40.0), 250.0);
    }

    #[test]
    fn test_foreign_currency_uses_snapshot() {
        let tx = transaction_with_rate(Some(40.0));
        assert_eq!(normalize(2000.0, "VES", &tx, 36.0), 50.0);
    }

    #[test]
    fn test_missing_snapshot_falls_back_to_default() {
        let tx = transaction_with_rate(None);
        assert_eq!(normalize(80.0, "VES", &tx, 40.0), 2.0);
    }

    #[test]
    fn test_round_trip_recovers_original_amount() {
        let tx = transaction_with_rate(Some(36.55));
        let usd = normalize(1234.56, "VES", &tx, 40.0);
        let recovered = usd * tx.exchange_rate_snapshot.unwrap();
        assert!((recovered - 1234.56).abs() < 1e-9);
    }

    #[test]
    fn test_same_inputs_same_output() {
        let tx = transaction_with_rate(Some(38.2));
        assert_eq!(
            normalize(500.0, "VES", &tx, 40.0),
            normalize(500.0, "VES", &tx, 40.0)
        );
    }
}
