//! Appraisal configuration: hurdle rate, duplicate-period policy and IRR solver limits

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Default hurdle (risk-free) rate when none is supplied
pub const DEFAULT_HURDLE_RATE: f64 = 0.08;

/// Default latest period a project may have
pub const DEFAULT_MAX_HORIZON: u32 = 10_000;

/// How to resolve two input entries that share the same period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The first entry supplied for a period is kept
    KeepFirst,
    /// The last entry supplied for a period is kept
    #[default]
    KeepLast,
    /// Amounts at the same period are added together
    Sum,
    /// Duplicate periods fail construction with a malformed input error
    Reject,
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "keep-first" | "first" => Ok(Self::KeepFirst),
            "keep-last" | "last" => Ok(Self::KeepLast),
            "sum" => Ok(Self::Sum),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "Unknown collision policy: {} (expected keep-first, keep-last, sum or reject)",
                other
            )),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::KeepFirst => "keep-first",
            Self::KeepLast => "keep-last",
            Self::Sum => "sum",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// Limits for the IRR root-finder
///
/// Newton-Raphson starts from `initial_guess`; if it stalls it falls back to
/// bisection starting from `[lower_bound, upper_bound]`. The bracket is widened
/// (upwards without limit, downwards towards -1) until NPV changes sign.
/// Newton steps, widenings and bisection steps are each capped by `max_iterations`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrSolverConfig {
    pub initial_guess: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Default for IrrSolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.1,
            tolerance: 1e-10,
            max_iterations: 1000,
            lower_bound: -0.99,
            upper_bound: 10.0,
        }
    }
}

/// Settings used when building and valuing a project
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppraisalConfig {
    /// Hurdle rate; `None` (or zero) resolves to [`DEFAULT_HURDLE_RATE`]
    pub hurdle_rate: Option<f64>,
    pub collision: CollisionPolicy,
    /// Entries after this period are rejected before the timeline is filled
    pub max_horizon: u32,
    pub solver: IrrSolverConfig,
}

impl Default for AppraisalConfig {
    fn default() -> Self {
        Self {
            hurdle_rate: None,
            collision: CollisionPolicy::default(),
            max_horizon: DEFAULT_MAX_HORIZON,
            solver: IrrSolverConfig::default(),
        }
    }
}

impl AppraisalConfig {
    /// Defaults overlaid with environment variables
    ///
    /// Reads `HURDLE_RATE`, `COLLISION_POLICY`, `MAX_HORIZON`,
    /// `IRR_MAX_ITERATIONS` and `IRR_TOLERANCE`. Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(rate) = lookup("HURDLE_RATE").and_then(|s| s.parse().ok()) {
            config.hurdle_rate = Some(rate);
        }
        if let Some(policy) = lookup("COLLISION_POLICY").and_then(|s| s.parse().ok()) {
            config.collision = policy;
        }
        if let Some(horizon) = lookup("MAX_HORIZON").and_then(|s| s.parse().ok()) {
            config.max_horizon = horizon;
        }
        if let Some(iterations) = lookup("IRR_MAX_ITERATIONS").and_then(|s| s.parse().ok()) {
            config.solver.max_iterations = iterations;
        }
        if let Some(tolerance) = lookup("IRR_TOLERANCE").and_then(|s| s.parse().ok()) {
            config.solver.tolerance = tolerance;
        }

        config
    }

    pub fn with_hurdle_rate(mut self, rate: f64) -> Self {
        self.hurdle_rate = Some(rate);
        self
    }

    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn with_max_horizon(mut self, max_horizon: u32) -> Self {
        self.max_horizon = max_horizon;
        self
    }

    /// Hurdle rate after default resolution
    ///
    /// Missing, zero and non-finite values all resolve to the default.
    pub fn resolved_hurdle_rate(&self) -> f64 {
        resolve_hurdle_rate(self.hurdle_rate)
    }
}

pub(crate) fn resolve_hurdle_rate(rate: Option<f64>) -> f64 {
    match rate {
        Some(r) if r != 0.0 && r.is_finite() => r,
        _ => DEFAULT_HURDLE_RATE,
    }
}
