//! Summary metrics for a project

use super::Project;
use crate::error::ValuationResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headline metrics for a project at one discount rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Report {
    pub irr: f64,
    pub hurdle_rate: f64,
    pub net_present_value: f64,
    pub equivalent_annuity: f64,
}

impl Report {
    /// Metric name to value, keyed as in the serialized form
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("irr", self.irr),
            ("hurdle-rate", self.hurdle_rate),
            ("net-present-value", self.net_present_value),
            ("equivalent-annuity", self.equivalent_annuity),
        ])
    }
}

impl Project {
    /// Compute all headline metrics
    ///
    /// NPV and equivalent annuity use `rate` when given, otherwise the
    /// project's hurdle rate. Any failing metric fails the whole report.
    pub fn describe(&self, rate: Option<f64>) -> ValuationResult<Report> {
        let rate = rate.unwrap_or_else(|| self.hurdle_rate());

        Ok(Report {
            irr: self.internal_rate_of_return()?,
            hurdle_rate: self.hurdle_rate(),
            net_present_value: self.net_present_value(rate)?,
            equivalent_annuity: self.equivalent_annuity(rate)?,
        })
    }
}
