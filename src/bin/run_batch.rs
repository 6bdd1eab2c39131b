//! Run estimates for every case in a CSV file
//!
//! Usage: cargo run --bin run_batch -- cases.csv [--output batch_output.csv]

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use autonomy_allowance::{intake::load_cases, Estimate, EstimateRunner, LoadedTariff};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Evaluate a CSV of households in parallel")]
struct Args {
    /// Cases file
    cases: PathBuf,

    /// Output CSV
    #[arg(long, default_value = "batch_output.csv")]
    output: PathBuf,

    /// Tariff config (JSON)
    #[arg(long, default_value = autonomy_allowance::tariff::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

/// One output line per case
#[derive(Debug, Default, Serialize)]
struct OutputRow {
    case_id: String,
    grade: Option<u8>,
    household_income: Option<f64>,
    ceiling: Option<f64>,
    effective_amount: Option<f64>,
    co_payment: Option<f64>,
    participation_rate: Option<f64>,
    net_subsidy: Option<f64>,
    exceeds_ceiling: Option<bool>,
    service_mode: Option<String>,
    hours_min: Option<u32>,
    hours_max: Option<u32>,
    error: Option<String>,
}

impl OutputRow {
    fn from_estimate(case_id: String, estimate: &Estimate) -> Self {
        let b = &estimate.benefit;
        Self {
            case_id,
            grade: Some(estimate.grade.value()),
            household_income: Some(round2(b.household_income)),
            ceiling: Some(round2(b.ceiling)),
            effective_amount: Some(round2(b.effective_amount)),
            co_payment: Some(round2(b.co_payment)),
            participation_rate: Some((b.participation_rate * 10_000.0).round() / 10_000.0),
            net_subsidy: Some(round2(b.net_subsidy)),
            exceeds_ceiling: Some(b.exceeds_ceiling),
            service_mode: estimate.selected.as_ref().map(|s| s.mode.clone()),
            hours_min: estimate.selected.as_ref().map(|s| s.range.min),
            hours_max: estimate.selected.as_ref().map(|s| s.range.max),
            error: None,
        }
    }

    fn from_error(case_id: String, error: String) -> Self {
        Self {
            case_id,
            error: Some(error),
            ..Default::default()
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let loaded = LoadedTariff::load_from(&args.config);
    println!("Tariff: {}", loaded.outcome);
    let runner = EstimateRunner::from_loaded(&loaded);

    println!("Loading cases from {}...", args.cases.display());
    let cases = load_cases(&args.cases)
        .with_context(|| format!("loading cases from {}", args.cases.display()))?;
    println!("Loaded {} cases in {:?}", cases.len(), start.elapsed());

    // Evaluations are independent; the runner is shared read-only
    let rows: Vec<OutputRow> = cases
        .into_par_iter()
        .map(|case| match case.request {
            Ok(request) => match runner.run(&request) {
                Ok(estimate) => OutputRow::from_estimate(case.case_id, &estimate),
                Err(e) => OutputRow::from_error(case.case_id, e.to_string()),
            },
            Err(e) => OutputRow::from_error(case.case_id, e.to_string()),
        })
        .collect();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let failed = rows.iter().filter(|r| r.error.is_some()).count();
    let mut by_grade = [0usize; 6];
    for g in rows.iter().filter_map(|r| r.grade) {
        by_grade[(g - 1) as usize] += 1;
    }

    println!("\nBatch Summary ({}):", chrono::Local::now().format("%Y-%m-%d %H:%M"));
    println!("  Cases:    {}", rows.len());
    println!("  Rejected: {}", failed);
    for (i, count) in by_grade.iter().enumerate() {
        println!("  Grade {}:  {}", i + 1, count);
    }
    println!("  Total allowance paid: {:.2} / month",
        rows.iter().filter_map(|r| r.net_subsidy).sum::<f64>());

    println!("\nOutput written to {}", args.output.display());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
