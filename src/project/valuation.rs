//! Discounting operations over a project timeline

use super::irr::calculate_irr;
use super::Project;
use crate::error::{check_rate, ValuationError, ValuationResult};

impl Project {
    /// Every entry moved to `target_time` at `rate`, summed
    pub fn value_at(&self, target_time: u32, rate: f64) -> ValuationResult<f64> {
        check_rate(rate)?;
        self.entries()
            .iter()
            .map(|entry| entry.value_at(target_time, rate))
            .sum()
    }

    /// Σ amount_t / (1 + rate)^t
    ///
    /// There is no implicit rate here; use [`Project::hurdle_rate`] explicitly
    /// when that is the rate wanted.
    pub fn net_present_value(&self, rate: f64) -> ValuationResult<f64> {
        self.value_at(0, rate)
    }

    /// Value of the whole project at its final period
    pub fn terminal_value(&self, rate: f64) -> ValuationResult<f64> {
        self.value_at(self.max_time(), rate)
    }

    /// Rate at which the net present value is zero
    pub fn internal_rate_of_return(&self) -> ValuationResult<f64> {
        calculate_irr(&self.amounts(), &self.solver)
    }

    /// Level payment over `max_time` periods with the same NPV as the project
    ///
    /// `c = rate * NPV / (1 - (1 + rate)^-n)`.
    ///
    /// # Errors
    /// `DivisionByZero` for a zero rate or a zero-period horizon.
    pub fn equivalent_annuity(&self, rate: f64) -> ValuationResult<f64> {
        check_rate(rate)?;
        if rate == 0.0 {
            return Err(ValuationError::DivisionByZero {
                context: "equivalent annuity is undefined at a zero rate",
            });
        }

        let periods = self.max_time();
        if periods == 0 {
            return Err(ValuationError::DivisionByZero {
                context: "equivalent annuity needs a horizon of at least one period",
            });
        }

        let denominator = 1.0 - (1.0 + rate).powf(-(periods as f64));
        if denominator == 0.0 {
            return Err(ValuationError::DivisionByZero {
                context: "annuity factor collapsed to zero",
            });
        }

        Ok(rate * self.net_present_value(rate)? / denominator)
    }

    /// Whether the project's IRR clears its hurdle rate
    pub fn meets_hurdle(&self) -> ValuationResult<bool> {
        Ok(self.internal_rate_of_return()? >= self.hurdle_rate())
    }
}
