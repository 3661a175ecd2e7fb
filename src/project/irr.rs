//! Internal Rate of Return (IRR) calculation
//!
//! Newton-Raphson from an initial guess, falling back to bisection. The
//! bisection bracket starts from the configured bounds and is widened until
//! NPV changes sign. Every phase is capped by `max_iterations`.

use crate::config::IrrSolverConfig;
use crate::error::{ValuationError, ValuationResult};
use log::debug;

/// Lowest rate the solver evaluates; NPV is undefined at -1
const RATE_FLOOR: f64 = -1.0 + 1e-9;

/// Periodic rate at which the NPV of `amounts` (index = period) is zero
///
/// # Errors
/// `NoConvergence` when the amounts never change sign or no rate in
/// `(-1, +inf)` with a sign change in NPV is found within the iteration caps.
pub fn calculate_irr(amounts: &[f64], config: &IrrSolverConfig) -> ValuationResult<f64> {
    if amounts.is_empty() {
        return Err(ValuationError::EmptyInput);
    }

    // Every rate is a root of an all-zero stream
    if amounts.iter().all(|&cf| cf.abs() < 1e-10) {
        return Ok(0.0);
    }

    // A root needs at least one sign change
    let has_positive = amounts.iter().any(|&cf| cf > 1e-10);
    let has_negative = amounts.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return Err(ValuationError::no_convergence(
            0,
            npv_at_rate(amounts, config.initial_guess),
        ));
    }

    let scale = amounts.iter().fold(1.0_f64, |acc, cf| acc.max(cf.abs()));
    let mut rate = config.initial_guess;

    for iteration in 0..config.max_iterations {
        let (npv, dnpv) = npv_and_derivative(amounts, rate);

        if dnpv.abs() < 1e-20 {
            debug!("IRR derivative vanished at rate {} (iteration {}), bisecting", rate, iteration);
            return calculate_irr_bisection(amounts, config);
        }

        let new_rate = (rate - npv / dnpv).max(RATE_FLOOR);
        if !new_rate.is_finite() {
            break;
        }

        if (new_rate - rate).abs() < config.tolerance {
            // Pinned against the floor is not a root
            if npv_at_rate(amounts, new_rate).abs() <= 1e-6 * scale {
                debug!("IRR converged to {} after {} Newton iterations", new_rate, iteration + 1);
                return Ok(new_rate);
            }
            break;
        }

        rate = new_rate;
    }

    debug!("Newton-Raphson did not settle on an IRR, bisecting");
    calculate_irr_bisection(amounts, config)
}

/// NPV and its derivative with respect to rate
fn npv_and_derivative(amounts: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in amounts.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / ((1.0 + rate).powi(t as i32 + 1));
        }
    }

    (npv, dnpv)
}

/// Widen `[lower_bound, upper_bound]` until NPV differs in sign at the ends
///
/// The upper end doubles each step; the lower end closes a tenth of the
/// remaining gap to -1 until it reaches [`RATE_FLOOR`].
fn bracket_root(amounts: &[f64], config: &IrrSolverConfig) -> ValuationResult<(f64, f64, f64)> {
    let mut low = config.lower_bound.max(RATE_FLOOR);
    let mut high = config.upper_bound.max(low + 1.0);

    let mut npv_low = npv_at_rate(amounts, low);
    let mut npv_high = npv_at_rate(amounts, high);
    let mut widenings = 0;

    while !brackets_root(npv_low, npv_high) {
        let exhausted = low <= RATE_FLOOR && !high.is_finite();
        if widenings >= config.max_iterations || exhausted {
            return Err(ValuationError::no_convergence(
                widenings,
                npv_low.abs().min(npv_high.abs()),
            ));
        }
        widenings += 1;

        if low > RATE_FLOOR {
            low = (-1.0 + (low + 1.0) / 10.0).max(RATE_FLOOR);
            npv_low = npv_at_rate(amounts, low);
        }
        if high.is_finite() {
            high = high * 2.0 + 1.0;
            npv_high = npv_at_rate(amounts, high);
        }
    }

    if widenings > 0 {
        debug!("Widened IRR bracket to [{}, {}] after {} steps", low, high, widenings);
    }
    Ok((low, high, npv_low))
}

/// NaN never brackets
fn brackets_root(npv_low: f64, npv_high: f64) -> bool {
    npv_low * npv_high <= 0.0
}

/// Fallback IRR calculation using bisection
fn calculate_irr_bisection(amounts: &[f64], config: &IrrSolverConfig) -> ValuationResult<f64> {
    let (mut low, mut high, mut npv_low) = bracket_root(amounts, config)?;
    if npv_low == 0.0 {
        return Ok(low);
    }

    let mut npv_mid = f64::NAN;
    for iteration in 0..config.max_iterations {
        let mid = (low + high) / 2.0;
        npv_mid = npv_at_rate(amounts, mid);

        if npv_mid.abs() < config.tolerance || (high - low) / 2.0 < config.tolerance {
            debug!("IRR bisection converged to {} after {} iterations", mid, iteration + 1);
            return Ok(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    Err(ValuationError::no_convergence(config.max_iterations, npv_mid.abs()))
}

/// NPV at a given periodic rate
pub(crate) fn npv_at_rate(amounts: &[f64], rate: f64) -> f64 {
    amounts
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}
