//! Cashflow Appraisal CLI
//!
//! Appraise a project from a CSV of `amount,time` rows.

use anyhow::{Context, Result};
use cashflow_appraisal::{npv_profile, rate_grid, AppraisalConfig, CollisionPolicy, Project};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cashflow_appraisal", version, about = "Appraise investment project cashflows")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// IRR, hurdle rate, NPV and equivalent annuity
    Describe {
        #[command(flatten)]
        input: InputArgs,

        /// Discount rate for NPV and annuity (defaults to the hurdle rate)
        #[arg(long)]
        rate: Option<f64>,
    },
    /// Dense (time, amount) timeline after gap filling
    Timeline {
        #[command(flatten)]
        input: InputArgs,
    },
    /// NPV across a range of discount rates
    Profile {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        from: f64,

        #[arg(long, default_value_t = 0.3)]
        to: f64,

        #[arg(long, default_value_t = 0.01)]
        step: f64,
    },
}

#[derive(Args)]
struct InputArgs {
    /// CSV file with `amount` and `time` columns
    file: PathBuf,

    /// Hurdle rate (overrides HURDLE_RATE)
    #[arg(long)]
    hurdle_rate: Option<f64>,

    /// Duplicate period handling: keep-first, keep-last, sum or reject
    #[arg(long)]
    collision: Option<CollisionPolicy>,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl InputArgs {
    fn load(&self) -> Result<Project> {
        let mut config = AppraisalConfig::from_env();
        if let Some(rate) = self.hurdle_rate {
            config = config.with_hurdle_rate(rate);
        }
        if let Some(collision) = self.collision {
            config = config.with_collision(collision);
        }

        Project::from_csv(&self.file, &config)
            .with_context(|| format!("Failed to load project from {}", self.file.display()))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Describe { input, rate } => {
            let project = input.load()?;
            let report = project.describe(rate).context("Failed to appraise project")?;

            if input.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Project: {} ({} periods)", input.file.display(), project.max_time());
                for (name, value) in report.to_map() {
                    println!("  {:<20} {:>14.6}", name, value);
                }
                let meets = report.irr >= report.hurdle_rate;
                println!("  {:<20} {:>14}", "meets-hurdle", if meets { "yes" } else { "no" });
            }
        }
        Command::Timeline { input } => {
            let project = input.load()?;

            if input.json {
                println!("{}", serde_json::to_string_pretty(project.entries())?);
            } else {
                println!("{:>6} {:>14}", "Time", "Amount");
                println!("{}", "-".repeat(21));
                for (time, amount) in project.series() {
                    println!("{:>6} {:>14.2}", time, amount);
                }
                println!("{}", "-".repeat(21));
                println!("{:>6} {:>14.2}", "Total", project.total_amount());
            }
        }
        Command::Profile { input, from, to, step } => {
            let project = input.load()?;
            let rates = rate_grid(from, to, step).context("Invalid rate range")?;
            let profile = npv_profile(&project, &rates).context("Failed to compute NPV profile")?;

            if input.json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("{:>10} {:>16}", "Rate", "NPV");
                println!("{}", "-".repeat(27));
                for point in &profile {
                    println!("{:>10.4} {:>16.4}", point.rate, point.net_present_value);
                }
            }
        }
    }

    Ok(())
}
