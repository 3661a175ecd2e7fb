//! Dense project timeline built from sparse cash entries

use crate::cashflow::{load_entries, load_entries_from_reader, CashEntry};
use crate::config::{resolve_hurdle_rate, AppraisalConfig, CollisionPolicy, IrrSolverConfig};
use crate::error::{ValuationError, ValuationResult};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// An investment project: one cash entry per period from 0 to the horizon
///
/// Gaps in the input are filled with zero-amount entries, so `entries()[t]`
/// is always the entry at period `t`. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    entries: Vec<CashEntry>,
    hurdle_rate: f64,
    pub(crate) solver: IrrSolverConfig,
}

impl Project {
    /// Build with the default collision policy (last entry wins)
    pub fn new<I>(entries: I, hurdle_rate: Option<f64>) -> ValuationResult<Self>
    where
        I: IntoIterator<Item = CashEntry>,
    {
        let config = AppraisalConfig {
            hurdle_rate,
            ..AppraisalConfig::default()
        };
        Self::build(entries, &config)
    }

    /// Build using the collision policy, hurdle rate and solver limits in `config`
    pub fn build<I>(entries: I, config: &AppraisalConfig) -> ValuationResult<Self>
    where
        I: IntoIterator<Item = CashEntry>,
    {
        let slots = index_by_time(entries, config.collision, config.max_horizon)?;
        let max_time = slots.keys().copied().max().ok_or(ValuationError::EmptyInput)?;

        let dense: Vec<CashEntry> = (0..=max_time)
            .map(|t| {
                slots
                    .get(&t)
                    .map(|&amount| CashEntry::new(amount, t))
                    .unwrap_or_else(|| CashEntry::zero(t))
            })
            .collect();

        debug!(
            "Densified {} distinct periods into {} entries (horizon {})",
            slots.len(),
            dense.len(),
            max_time
        );

        Ok(Self {
            entries: dense,
            hurdle_rate: config.resolved_hurdle_rate(),
            solver: config.solver,
        })
    }

    /// Load entries from a CSV file and build
    pub fn from_csv<P: AsRef<Path>>(path: P, config: &AppraisalConfig) -> ValuationResult<Self> {
        Self::build(load_entries(path)?, config)
    }

    /// Load entries from any CSV reader and build
    pub fn from_reader<R: Read>(reader: R, config: &AppraisalConfig) -> ValuationResult<Self> {
        Self::build(load_entries_from_reader(reader)?, config)
    }

    /// Dense entries, position == period
    pub fn entries(&self) -> &[CashEntry] {
        &self.entries
    }

    pub fn hurdle_rate(&self) -> f64 {
        self.hurdle_rate
    }

    /// Last period of the project
    pub fn max_time(&self) -> u32 {
        // Never empty: construction rejects empty input
        self.entries.last().map(|e| e.time()).unwrap_or(0)
    }

    /// Amounts in period order
    pub fn amounts(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.amount()).collect()
    }

    /// `(time, amount)` pairs for bar-chart renderers
    pub fn series(&self) -> Vec<(u32, f64)> {
        self.entries.iter().map(|e| (e.time(), e.amount())).collect()
    }

    /// Undiscounted sum of all amounts
    pub fn total_amount(&self) -> f64 {
        self.entries.iter().map(|e| e.amount()).sum()
    }

    /// Copy of this project with a different hurdle rate (same resolution rules)
    pub fn with_hurdle_rate(&self, hurdle_rate: Option<f64>) -> Self {
        Self {
            entries: self.entries.clone(),
            hurdle_rate: resolve_hurdle_rate(hurdle_rate),
            solver: self.solver,
        }
    }
}

/// Collapse entries to one amount per period under `policy`
///
/// Periods beyond `max_horizon` are rejected here, before any dense storage
/// is sized from them.
fn index_by_time<I>(
    entries: I,
    policy: CollisionPolicy,
    max_horizon: u32,
) -> ValuationResult<HashMap<u32, f64>>
where
    I: IntoIterator<Item = CashEntry>,
{
    let mut slots: HashMap<u32, f64> = HashMap::new();
    let mut collisions = 0usize;

    for entry in entries {
        if entry.time() > max_horizon {
            return Err(ValuationError::malformed(format!(
                "period {} is beyond the maximum horizon of {} periods",
                entry.time(),
                max_horizon
            )));
        }
        match slots.get_mut(&entry.time()) {
            None => {
                slots.insert(entry.time(), entry.amount());
            }
            Some(existing) => {
                collisions += 1;
                match policy {
                    CollisionPolicy::KeepFirst => {}
                    CollisionPolicy::KeepLast => *existing = entry.amount(),
                    CollisionPolicy::Sum => *existing += entry.amount(),
                    CollisionPolicy::Reject => {
                        return Err(ValuationError::malformed(format!(
                            "duplicate cash entry at period {}",
                            entry.time()
                        )));
                    }
                }
            }
        }
    }

    if collisions > 0 {
        warn!(
            "{} cash entries shared a period with an earlier entry; resolved with {}",
            collisions, policy
        );
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse_entries() -> Vec<CashEntry> {
        vec![
            CashEntry::new(500.0, 6),
            CashEntry::new(-1000.0, 0),
            CashEntry::new(300.0, 1),
            CashEntry::new(400.0, 3),
        ]
    }

    #[test]
    fn test_one_entry_per_period() {
        let project = Project::new(sparse_entries(), None).unwrap();

        assert_eq!(project.max_time(), 6);
        assert_eq!(project.entries().len(), 7);
        for (t, entry) in project.entries().iter().enumerate() {
            assert_eq!(entry.time() as usize, t);
        }

        // Gaps are zero-filled
        assert_eq!(project.entries()[2], CashEntry::zero(2));
        assert_eq!(project.entries()[5].amount(), 0.0);
        assert_eq!(project.entries()[6].amount(), 500.0);
    }

    #[test]
    fn test_densification_is_idempotent() {
        let project = Project::new(sparse_entries(), None).unwrap();
        let rebuilt = Project::new(project.entries().to_vec(), None).unwrap();

        assert_eq!(rebuilt.entries(), project.entries());
    }

    #[test]
    fn test_empty_input() {
        let result = Project::new(Vec::new(), None);
        assert!(matches!(result, Err(ValuationError::EmptyInput)));
    }

    #[test]
    fn test_single_entry_at_zero() {
        let project = Project::new(vec![CashEntry::new(42.0, 0)], None).unwrap();
        assert_eq!(project.max_time(), 0);
        assert_eq!(project.series(), vec![(0, 42.0)]);
    }

    #[test]
    fn test_last_write_wins_by_default() {
        let entries = vec![
            CashEntry::new(-100.0, 0),
            CashEntry::new(10.0, 1),
            CashEntry::new(25.0, 1),
        ];
        let project = Project::new(entries, None).unwrap();

        assert_eq!(project.entries()[1].amount(), 25.0);
    }

    #[test]
    fn test_collision_policies() {
        let entries = vec![
            CashEntry::new(-100.0, 0),
            CashEntry::new(10.0, 1),
            CashEntry::new(25.0, 1),
        ];
        let build = |policy| {
            let config = AppraisalConfig::default().with_collision(policy);
            Project::build(entries.clone(), &config)
        };

        assert_eq!(build(CollisionPolicy::KeepFirst).unwrap().entries()[1].amount(), 10.0);
        assert_eq!(build(CollisionPolicy::KeepLast).unwrap().entries()[1].amount(), 25.0);
        assert_eq!(build(CollisionPolicy::Sum).unwrap().entries()[1].amount(), 35.0);
        assert!(matches!(
            build(CollisionPolicy::Reject),
            Err(ValuationError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_period_beyond_horizon_rejected() {
        let data = "amount,time\n-100,0\n1,4000000000\n";
        let result = Project::from_reader(data.as_bytes(), &AppraisalConfig::default());
        assert!(matches!(result, Err(ValuationError::MalformedInput { .. })));

        let config = AppraisalConfig::default().with_max_horizon(5);
        let entries = vec![CashEntry::new(-100.0, 0), CashEntry::new(60.0, 6)];
        assert!(matches!(
            Project::build(entries.clone(), &config),
            Err(ValuationError::MalformedInput { .. })
        ));

        // The horizon itself is allowed
        let config = AppraisalConfig::default().with_max_horizon(6);
        assert_eq!(Project::build(entries, &config).unwrap().max_time(), 6);
    }

    #[test]
    fn test_hurdle_rate_defaults() {
        let entries = sparse_entries();
        assert_eq!(Project::new(entries.clone(), None).unwrap().hurdle_rate(), 0.08);
        assert_eq!(Project::new(entries.clone(), Some(0.0)).unwrap().hurdle_rate(), 0.08);
        assert_eq!(Project::new(entries, Some(0.11)).unwrap().hurdle_rate(), 0.11);
    }

    #[test]
    fn test_from_reader_any_row_order() {
        let data = "amount,time\n60,2\n-100,0\n60,1\n";
        let project = Project::from_reader(data.as_bytes(), &AppraisalConfig::default()).unwrap();

        assert_eq!(project.amounts(), vec![-100.0, 60.0, 60.0]);
        assert_eq!(project.total_amount(), 20.0);
    }

    #[test]
    fn test_from_csv_sample() {
        let project = Project::from_csv("data/sample_project.csv", &AppraisalConfig::default())
            .expect("Failed to load sample project");

        assert_eq!(project.entries().len(), 7);
        assert_eq!(project.entries()[0].amount(), -1000.0);
        assert_eq!(project.entries()[2].amount(), 0.0);
    }
}
