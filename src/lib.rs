//! Cashflow Appraisal - time-value-of-money metrics for investment projects
//!
//! This library provides:
//! - Cash entries with pure present/future value formulas
//! - Dense project timelines built from sparse (time, amount) entries
//! - Net present value, internal rate of return and equivalent annuity
//! - CSV loading and parallel rate-sensitivity / batch appraisal

pub mod error;
pub mod config;
pub mod cashflow;
pub mod project;
pub mod sensitivity;

// Re-export commonly used types
pub use error::{ValuationError, ValuationResult};
pub use config::{AppraisalConfig, CollisionPolicy, IrrSolverConfig, DEFAULT_HURDLE_RATE};
pub use cashflow::CashEntry;
pub use project::{Project, Report};
pub use sensitivity::{appraise_batch, npv_profile, rate_grid, NpvPoint};
