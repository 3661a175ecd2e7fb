//! Appraise many project CSV files in parallel
//!
//! Usage: batch_appraisal [--rate R] [--output summary.csv] <FILE>...
//! Configuration comes from the environment (HURDLE_RATE, COLLISION_POLICY, ...).
//! Projects that fail to load or value are listed with their error instead of metrics.

use anyhow::{Context, Result};
use cashflow_appraisal::{appraise_batch, AppraisalConfig, Project, Report};
use clap::Parser;
use log::{info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "batch_appraisal", about = "Appraise many project CSV files")]
struct Cli {
    /// Project CSV files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Discount rate for NPV and annuity (defaults to each project's hurdle rate)
    #[arg(long)]
    rate: Option<f64>,

    /// Summary CSV path
    #[arg(long, default_value = "appraisal_summary.csv")]
    output: PathBuf,
}

/// One line of the summary CSV
#[derive(Debug, serde::Serialize)]
struct SummaryRow {
    project: String,
    periods: Option<u32>,
    irr: Option<f64>,
    hurdle_rate: Option<f64>,
    net_present_value: Option<f64>,
    equivalent_annuity: Option<f64>,
    meets_hurdle: Option<bool>,
    error: Option<String>,
}

impl SummaryRow {
    fn failed(project: String, periods: Option<u32>, error: String) -> Self {
        Self {
            project,
            periods,
            irr: None,
            hurdle_rate: None,
            net_present_value: None,
            equivalent_annuity: None,
            meets_hurdle: None,
            error: Some(error),
        }
    }

    fn from_report(project: String, periods: u32, report: &Report) -> Self {
        Self {
            project,
            periods: Some(periods),
            irr: Some(report.irr),
            hurdle_rate: Some(report.hurdle_rate),
            net_present_value: Some(report.net_present_value),
            equivalent_annuity: Some(report.equivalent_annuity),
            meets_hurdle: Some(report.irr >= report.hurdle_rate),
            error: None,
        }
    }
}

/// One summary row per input, in input order
///
/// Files that failed to load keep their position among the appraised ones.
fn summarize(
    loaded: Vec<(String, Result<Project, String>)>,
    rate: Option<f64>,
) -> Vec<SummaryRow> {
    // Summary rows are indexed by input position so failures stay in place
    let mut rows: Vec<Option<SummaryRow>> = Vec::with_capacity(loaded.len());
    let mut positions = Vec::new();
    let mut names = Vec::new();
    let mut projects = Vec::new();

    for (position, (name, project)) in loaded.into_iter().enumerate() {
        match project {
            Ok(project) => {
                rows.push(None);
                positions.push(position);
                names.push(name);
                projects.push(project);
            }
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                rows.push(Some(SummaryRow::failed(name, None, e)));
            }
        }
    }

    info!("Loaded {} projects", projects.len());

    let reports = appraise_batch(&projects, rate);
    for (((position, name), project), report) in positions
        .into_iter()
        .zip(names)
        .zip(&projects)
        .zip(reports)
    {
        let row = match report {
            Ok(report) => SummaryRow::from_report(name, project.max_time(), &report),
            Err(e) => {
                warn!("Could not appraise {}: {}", name, e);
                SummaryRow::failed(name, Some(project.max_time()), e.to_string())
            }
        };
        rows[position] = Some(row);
    }
    rows.into_iter().flatten().collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppraisalConfig::from_env();
    let start = Instant::now();

    // Load in parallel; par_iter().collect() keeps file order
    let loaded: Vec<(String, Result<Project, String>)> = cli
        .files
        .par_iter()
        .map(|path| {
            let name = path.display().to_string();
            let project = Project::from_csv(path, &config).map_err(|e| e.to_string());
            (name, project)
        })
        .collect();

    let rows = summarize(loaded, cli.rate);

    let file = File::create(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let failures = rows.iter().filter(|r| r.error.is_some()).count();
    println!(
        "Appraised {} projects ({} failed) in {:?}",
        rows.len(),
        failures,
        start.elapsed()
    );
    println!("Summary written to {}", cli.output.display());

    Ok(())
}
