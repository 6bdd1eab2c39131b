//! Autonomy Allowance CLI
//!
//! Estimates the dependency grade, allowance, co-payment and service hours
//! for one household.
//!
//! Usage:
//!   autonomy-allowance --answers 0,0,1,1,0,0,2,0,0,0 --income 1500
//!   autonomy-allowance --request case.json --json

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use autonomy_allowance::{
    AssessmentResult, Domain, Estimate, EstimateRequest, EstimateRunner, FamilySituation,
    LoadedTariff,
};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "autonomy-allowance", version, about = "Estimate dependency grade and allowance")]
struct Args {
    /// Tariff config (JSON); falls back to built-in defaults when absent or invalid
    #[arg(long, default_value = autonomy_allowance::tariff::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Full request as JSON (answers, income, ...); overrides the other case flags
    #[arg(long, conflicts_with_all = ["answers", "income"])]
    request: Option<PathBuf>,

    /// Ten answers (0, 1 or 2) in grid order: coherence, orientation, hygiene,
    /// dressing, eating, elimination, transfers, indoor_mobility,
    /// outdoor_mobility, communication
    #[arg(long, value_delimiter = ',', required_unless_present = "request")]
    answers: Vec<i64>,

    /// Monthly household income
    #[arg(long, required_unless_present = "request")]
    income: Option<f64>,

    /// single or couple
    #[arg(long, default_value = "single")]
    family_situation: String,

    /// Requested aid-plan amount (defaults to the grade ceiling)
    #[arg(long)]
    requested_amount: Option<f64>,

    /// Service-delivery mode to report hours for
    #[arg(long)]
    mode: Option<String>,

    /// Print the estimate as JSON instead of a report
    #[arg(long)]
    json: bool,
}

fn build_request(args: &Args) -> Result<EstimateRequest> {
    if let Some(path) = &args.request {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading request {}", path.display()))?;
        return serde_json::from_str(&text)
            .with_context(|| format!("parsing request {}", path.display()));
    }

    if args.answers.len() != Domain::ALL.len() {
        bail!("expected {} answers, got {}", Domain::ALL.len(), args.answers.len());
    }
    let answers = AssessmentResult::from_raw(
        Domain::ALL.iter().map(|d| d.code()).zip(args.answers.iter().copied()),
    )?;
    let family_situation: FamilySituation = args.family_situation.parse()?;

    Ok(EstimateRequest {
        answers,
        family_situation,
        household_income: args.income.unwrap_or_default(),
        requested_amount: args.requested_amount,
        service_mode: args.mode.clone(),
    })
}

fn print_report(estimate: &Estimate) {
    let b = &estimate.benefit;

    println!("Grade estimate: {}", estimate.grade);
    println!("  {}", estimate.grade_description);
    println!("  Track: {:?}", estimate.track);
    if estimate.domains_needing_help.is_empty() {
        println!("  No domain needs assistance");
    } else {
        println!("  Domains needing assistance:");
        for d in &estimate.domains_needing_help {
            println!("    - {}", d.label());
        }
    }
    println!();

    println!("Monthly figures:");
    println!("  Resources taken into account: {:>10.2}", b.household_income);
    if b.ceiling > 0.0 {
        println!("  Ceiling for grade:            {:>10.2}", b.ceiling);
    } else {
        println!("  Ceiling for grade:            not applicable");
    }
    println!("  Aid plan retained (A):        {:>10.2}", b.effective_amount);
    if b.exceeds_ceiling {
        println!("    (requested {:.2}, capped at the ceiling)", b.requested_amount);
    }
    println!("  Participation rate:           {:>9.1} %", b.participation_rate * 100.0);
    println!("  Co-payment:                   {:>10.2}", b.co_payment);
    println!("  Allowance paid:               {:>10.2}", b.net_subsidy);
    println!();

    println!("Possible hours per month:");
    println!("{:<24} {:>8} {:>10}", "Mode", "Rate/h", "Hours");
    println!("{}", "-".repeat(44));
    for hours in estimate.hours_by_mode.values() {
        let marker = match &estimate.selected {
            Some(s) if s.mode == hours.mode => " *",
            _ => "",
        };
        println!("{:<24} {:>8.2} {:>4}-{:<4}{}",
            hours.mode, hours.hourly_rate, hours.range.min, hours.range.max, marker);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let loaded = LoadedTariff::load_from(&args.config);
    if loaded.outcome.is_fallback() {
        eprintln!("warning: tariff {}", loaded.outcome);
    }

    let request = build_request(&args)?;
    let runner = EstimateRunner::from_loaded(&loaded);
    let estimate = runner.run(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    println!("Autonomy Allowance Estimate - {}", chrono::Local::now().format("%Y-%m-%d %H:%M"));
    println!("==========================================\n");
    print_report(&estimate);
    println!("\nIndicative estimate, to be confirmed by an on-site evaluation.");

    Ok(())
}
