//! Error types for cashflow valuation

use thiserror::Error;

/// Result alias used throughout the valuation engine
pub type ValuationResult<T> = Result<T, ValuationError>;

/// Errors raised while building a project or valuing its cashflows
#[derive(Error, Debug)]
pub enum ValuationError {
    /// No cash entries were supplied to project construction
    #[error("Cannot build a project timeline from an empty set of cash entries")]
    EmptyInput,

    /// A tabular row or entry could not be turned into a valid (amount, time) pair
    #[error("Malformed input: {reason}")]
    MalformedInput {
        /// Description of what was wrong with the input
        reason: String,
    },

    /// A rate outside the valuation domain (rate must be greater than -1)
    #[error("Rate {rate} is outside the valuation domain (must be finite and greater than -1)")]
    Domain {
        /// The offending rate
        rate: f64,
    },

    /// Equivalent annuity denominator collapsed to zero
    #[error("Division by zero: {context}")]
    DivisionByZero {
        /// Which part of the formula degenerated
        context: &'static str,
    },

    /// IRR root-finding found no real root within its iteration bound
    #[error("IRR did not converge after {iterations} iterations (residual: {residual:.2e})")]
    NoConvergence {
        /// Number of iterations attempted
        iterations: u32,
        /// Final NPV residual
        residual: f64,
    },

    /// File access failure while loading tabular input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ValuationError {
    /// Shorthand for a malformed input error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    /// Shorthand for a no-convergence error
    pub fn no_convergence(iterations: u32, residual: f64) -> Self {
        Self::NoConvergence {
            iterations,
            residual,
        }
    }
}

/// Reject rates at or below -1 (the discount base would be zero or negative)
pub(crate) fn check_rate(rate: f64) -> ValuationResult<()> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(ValuationError::Domain { rate });
    }
    Ok(())
}
