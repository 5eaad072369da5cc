//! Bill split calculator
//!
//! Display-only arithmetic: a split never becomes per-payer ledger records.
//! The order itself always settles with a single total and payment method;
//! these helpers tell the operator what each payer owes.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::orders::money::{to_decimal, to_f64};

/// Payer count bounds for equal and manual splits
pub const MIN_SPLIT_PAYERS: usize = 2;
pub const MAX_SPLIT_PAYERS: usize = 10;

/// Split errors
#[derive(Debug, Error, PartialEq)]
pub enum BillingError {
    #[error("Split requires between {MIN_SPLIT_PAYERS} and {MAX_SPLIT_PAYERS} payers, got {0}")]
    PayerCountOutOfRange(usize),

    #[error("Manual split does not balance: remainder {0:.2}")]
    UnbalancedSplit(f64),

    #[error("Split amounts must be non-negative")]
    NegativeAmount,
}

/// One payer's share
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PayerShare {
    /// 1-based payer index ("Person 1", "Person 2", ...)
    pub payer: usize,
    pub amount: f64,
}

/// Split the final total equally across `payers`.
///
/// Cent-accurate: every payer but the last pays `floor(total_cents / n)`
/// cents; the last payer settles the exact remaining amount, so the shares
/// always sum to the total.
pub fn equal_split(final_total: f64, payers: usize) -> Result<Vec<PayerShare>, BillingError> {
    if !(MIN_SPLIT_PAYERS..=MAX_SPLIT_PAYERS).contains(&payers) {
        return Err(BillingError::PayerCountOutOfRange(payers));
    }

    let total = to_decimal(final_total);
    let total_cents = (total * Decimal::ONE_HUNDRED).trunc();
    let base_cents = (total_cents / Decimal::from(payers)).trunc();
    let base = base_cents / Decimal::ONE_HUNDRED;

    let mut shares = Vec::with_capacity(payers);
    let mut allocated = Decimal::ZERO;
    for payer in 1..payers {
        shares.push(PayerShare {
            payer,
            amount: to_f64(base),
        });
        allocated += base;
    }
    // Last payer absorbs the rounding remainder
    shares.push(PayerShare {
        payer: payers,
        amount: to_f64(total - allocated),
    });
    Ok(shares)
}

/// Remainder the operator still has to distribute in a manual split:
/// `final_total - Σ(amounts)`. Negative means the amounts overshoot.
pub fn manual_split_remainder(final_total: f64, amounts: &[f64]) -> f64 {
    let sum: Decimal = amounts.iter().map(|a| to_decimal(*a)).sum();
    to_f64(to_decimal(final_total) - sum)
}

/// Validate a manual split before payment confirmation: the amounts must
/// balance the total exactly (zero remainder).
pub fn validate_manual_split(final_total: f64, amounts: &[f64]) -> Result<(), BillingError> {
    if !(MIN_SPLIT_PAYERS..=MAX_SPLIT_PAYERS).contains(&amounts.len()) {
        return Err(BillingError::PayerCountOutOfRange(amounts.len()));
    }
    if amounts.iter().any(|a| *a < 0.0 || !a.is_finite()) {
        return Err(BillingError::NegativeAmount);
    }
    let remainder = manual_split_remainder(final_total, amounts);
    if remainder != 0.0 {
        return Err(BillingError::UnbalancedSplit(remainder));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(shares: &[PayerShare]) -> f64 {
        to_f64(shares.iter().map(|s| to_decimal(s.amount)).sum())
    }

    #[test]
    fn equal_split_sums_exactly_for_all_payer_counts() {
        for payers in MIN_SPLIT_PAYERS..=MAX_SPLIT_PAYERS {
            let shares = equal_split(60.50, payers).unwrap();
            assert_eq!(shares.len(), payers);
            assert_eq!(sum(&shares), 60.50, "payers = {}", payers);
            // Shares differ by at most one cent
            let min = shares.iter().map(|s| s.amount).fold(f64::MAX, f64::min);
            let max = shares.iter().map(|s| s.amount).fold(f64::MIN, f64::max);
            assert!(max - min < 0.10, "payers = {}: {} .. {}", payers, min, max);
        }
    }

    #[test]
    fn last_payer_absorbs_the_remainder() {
        // 100.00 / 3 = 33.33 + 33.33 + 33.34
        let shares = equal_split(100.0, 3).unwrap();
        assert_eq!(shares[0].amount, 33.33);
        assert_eq!(shares[1].amount, 33.33);
        assert_eq!(shares[2].amount, 33.34);
    }

    #[test]
    fn payer_count_bounds_are_enforced() {
        assert_eq!(
            equal_split(100.0, 1),
            Err(BillingError::PayerCountOutOfRange(1))
        );
        assert_eq!(
            equal_split(100.0, 11),
            Err(BillingError::PayerCountOutOfRange(11))
        );
    }

    #[test]
    fn manual_remainder_tracks_missing_and_excess() {
        assert_eq!(manual_split_remainder(60.50, &[30.0, 20.0]), 10.50);
        assert_eq!(manual_split_remainder(60.50, &[30.25, 30.25]), 0.0);
        assert_eq!(manual_split_remainder(60.50, &[40.0, 30.0]), -9.50);
    }

    #[test]
    fn manual_split_confirmation_requires_exact_balance() {
        assert!(validate_manual_split(60.50, &[30.25, 30.25]).is_ok());
        assert_eq!(
            validate_manual_split(60.50, &[30.0, 30.0]),
            Err(BillingError::UnbalancedSplit(0.50))
        );
        assert_eq!(
            validate_manual_split(60.50, &[60.50]),
            Err(BillingError::PayerCountOutOfRange(1))
        );
        assert_eq!(
            validate_manual_split(60.50, &[70.0, -9.50]),
            Err(BillingError::NegativeAmount)
        );
    }
}
