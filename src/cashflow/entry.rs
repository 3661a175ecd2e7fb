//! A single cash amount at a discrete period

use crate::error::{check_rate, ValuationError, ValuationResult};
use serde::{Deserialize, Serialize};

/// Monetary amount received (positive) or paid (negative) at period `time`
///
/// Entries are immutable once built; all valuation is pure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashEntry {
    amount: f64,
    time: u32,
}

impl CashEntry {
    /// Create an entry at a non-negative period
    pub fn new(amount: f64, time: u32) -> Self {
        Self { amount, time }
    }

    /// Create an entry from unchecked values (e.g. a parsed table row)
    ///
    /// Fails with `MalformedInput` for a negative period or a non-finite amount.
    pub fn try_new(amount: f64, time: i64) -> ValuationResult<Self> {
        if !amount.is_finite() {
            return Err(ValuationError::malformed(format!(
                "amount {} at period {} is not a finite number",
                amount, time
            )));
        }
        let time = u32::try_from(time).map_err(|_| {
            ValuationError::malformed(format!("period {} is outside 0..={}", time, u32::MAX))
        })?;
        Ok(Self::new(amount, time))
    }

    /// Zero-amount placeholder used to fill gaps in a timeline
    pub fn zero(time: u32) -> Self {
        Self::new(0.0, time)
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn time(&self) -> u32 {
        self.time
    }

    /// Value of this amount moved to `target_time` at a periodic `rate`
    ///
    /// `amount * (1 + rate)^(target_time - time)`. Compounds forward when the
    /// target is later, discounts when it is earlier.
    pub fn value_at(&self, target_time: u32, rate: f64) -> ValuationResult<f64> {
        check_rate(rate)?;
        let periods = i64::from(target_time) - i64::from(self.time);
        Ok(self.amount * growth_factor(rate, periods))
    }

    /// Value discounted to period 0
    pub fn present_value(&self, rate: f64) -> ValuationResult<f64> {
        self.value_at(0, rate)
    }
}

/// `(1 + rate)^periods` for a whole number of periods
fn growth_factor(rate: f64, periods: i64) -> f64 {
    match i32::try_from(periods) {
        Ok(n) => (1.0 + rate).powi(n),
        Err(_) => (1.0 + rate).powf(periods as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_present_value_discounts() {
        let entry = CashEntry::new(108.0, 1);
        assert_relative_eq!(entry.present_value(0.08).unwrap(), 100.0, epsilon = 1e-10);

        let entry = CashEntry::new(60.0, 2);
        assert_relative_eq!(
            entry.present_value(0.08).unwrap(),
            60.0 / 1.08_f64.powi(2),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_present_value_matches_value_at_zero() {
        let entry = CashEntry::new(-250.0, 7);
        for rate in [-0.5, -0.01, 0.0, 0.03, 0.08, 0.25, 1.5] {
            assert_eq!(
                entry.present_value(rate).unwrap(),
                entry.value_at(0, rate).unwrap()
            );
        }
    }

    #[test]
    fn test_value_at_compounds_forward() {
        let entry = CashEntry::new(100.0, 0);
        assert_relative_eq!(entry.value_at(3, 0.1).unwrap(), 133.1, epsilon = 1e-10);
        // Same period is the amount itself
        assert_eq!(entry.value_at(0, 0.1).unwrap(), 100.0);
    }

    #[test]
    fn test_rate_outside_domain() {
        let entry = CashEntry::new(100.0, 2);
        assert!(matches!(
            entry.present_value(-1.0),
            Err(ValuationError::Domain { .. })
        ));
        assert!(matches!(
            entry.value_at(5, -3.0),
            Err(ValuationError::Domain { .. })
        ));
    }

    #[test]
    fn test_try_new_rejects_negative_time() {
        assert!(matches!(
            CashEntry::try_new(10.0, -1),
            Err(ValuationError::MalformedInput { .. })
        ));
        assert!(matches!(
            CashEntry::try_new(f64::INFINITY, 1),
            Err(ValuationError::MalformedInput { .. })
        ));

        let entry = CashEntry::try_new(10.0, 4).unwrap();
        assert_eq!(entry.time(), 4);
        assert_eq!(entry.amount(), 10.0);
    }
}
