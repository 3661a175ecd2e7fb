//! Rate sensitivity and batch appraisal
//!
//! Projects are immutable, so many rates (or many projects) can be valued in
//! parallel without locking.

use crate::error::{check_rate, ValuationError, ValuationResult};
use crate::project::{Project, Report};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// NPV of a project at one rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpvPoint {
    pub rate: f64,
    pub net_present_value: f64,
}

/// Evenly spaced rates from `from` to `to` inclusive
pub fn rate_grid(from: f64, to: f64, step: f64) -> ValuationResult<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(ValuationError::malformed(format!(
            "rate step must be positive, got {}",
            step
        )));
    }
    check_rate(from)?;
    check_rate(to)?;
    if to < from {
        return Err(ValuationError::malformed(format!(
            "rate range is reversed: {} > {}",
            from, to
        )));
    }

    // Small slack so the upper bound survives floating point accumulation
    let count = ((to - from) / step + 1e-9).floor() as usize;
    Ok((0..=count).map(|i| from + step * i as f64).collect())
}

/// NPV at each rate, in the order given
pub fn npv_profile(project: &Project, rates: &[f64]) -> ValuationResult<Vec<NpvPoint>> {
    rates
        .par_iter()
        .map(|&rate| -> ValuationResult<NpvPoint> {
            Ok(NpvPoint {
                rate,
                net_present_value: project.net_present_value(rate)?,
            })
        })
        .collect()
}

/// Describe every project; one failing project does not affect the others
pub fn appraise_batch(projects: &[Project], rate: Option<f64>) -> Vec<ValuationResult<Report>> {
    projects
        .par_iter()
        .map(|project| project.describe(rate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashflow::CashEntry;
    use approx::assert_relative_eq;

    fn project(amounts: &[f64]) -> Project {
        let entries = amounts
            .iter()
            .enumerate()
            .map(|(t, &a)| CashEntry::new(a, t as u32));
        Project::new(entries, None).unwrap()
    }

    #[test]
    fn test_rate_grid() {
        let rates = rate_grid(0.0, 0.1, 0.02).unwrap();
        assert_eq!(rates.len(), 6);
        assert_relative_eq!(rates[5], 0.1, epsilon = 1e-12);

        assert!(rate_grid(0.0, 0.1, 0.0).is_err());
        assert!(rate_grid(0.1, 0.0, 0.01).is_err());
        assert!(matches!(
            rate_grid(-1.5, 0.0, 0.1),
            Err(ValuationError::Domain { .. })
        ));
    }

    #[test]
    fn test_npv_profile_preserves_order() {
        let project = project(&[-100.0, 60.0, 60.0]);
        let rates = rate_grid(0.0, 0.3, 0.05).unwrap();
        let profile = npv_profile(&project, &rates).unwrap();

        assert_eq!(profile.len(), rates.len());
        for (point, &rate) in profile.iter().zip(&rates) {
            assert_eq!(point.rate, rate);
            assert_eq!(point.net_present_value, project.net_present_value(rate).unwrap());
        }
        assert_relative_eq!(profile[0].net_present_value, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_npv_profile_fails_on_bad_rate() {
        let project = project(&[-100.0, 60.0, 60.0]);
        assert!(npv_profile(&project, &[0.05, -1.0]).is_err());
    }

    #[test]
    fn test_appraise_batch() {
        let projects = vec![
            project(&[-100.0, 60.0, 60.0]),
            project(&[100.0, 50.0]),
            project(&[-1000.0, 1100.0]),
        ];

        let reports = appraise_batch(&projects, None);

        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_ok());
        assert!(matches!(reports[1], Err(ValuationError::NoConvergence { .. })));
        assert_relative_eq!(reports[2].as_ref().unwrap().irr, 0.10, epsilon = 1e-9);
    }
}
