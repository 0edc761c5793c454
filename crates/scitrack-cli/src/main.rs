//! Science Tracker command line
//!
//! Reconciles the science recorded in a save document against the stock
//! reference tables and prints what is left to collect.
//!
//! Usage:
//!   scitrack report --save career.json
//!   scitrack report --save career.json --group-by experiment --body Mun
//!   scitrack check --verbose
//!
//! Log output goes to stderr and is controlled with `RUST_LOG`.

mod check;
mod data;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use scitrack_logic::view::GroupBy;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scitrack", version, about = "Track remaining science in a career save")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print statistics and the remaining experiments for a save.
    Report(ReportArgs),
    /// Validate the reference data.
    Check(CheckArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Save document, already converted to JSON.
    #[arg(long)]
    save: PathBuf,

    /// Directory holding experiments.json and celestial_bodies.json
    /// (default: built-in stock tables).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Settings JSON overriding base values and body restrictions.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Grouping: body, experiment or situation.
    #[arg(long, default_value = "body")]
    group_by: GroupBy,

    /// Only show one body.
    #[arg(long)]
    body: Option<String>,

    /// Only show one experiment (type id or display name).
    #[arg(long)]
    experiment: Option<String>,

    /// Emit statistics and available entries as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CheckArgs {
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Print passing checks too.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Report(args) => run_report(args),
        Command::Check(args) => {
            let sources = data::load_sources(args.data_dir.as_deref())?;
            if !check::run(&sources, args.verbose) {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn run_report(args: ReportArgs) -> Result<()> {
    let tables = data::load_tables(args.data_dir.as_deref())?;
    let settings = data::load_settings(args.settings.as_deref())?;
    let document = data::load_save(&args.save)?;

    let extraction = scitrack_logic::extract::extract(&document);
    let result = scitrack_logic::pass::run(&tables, &extraction.ledger, &settings);

    let experiment_type = args.experiment.map(|e| {
        if tables.experiment(&e).is_some() {
            e
        } else {
            tables
                .experiment_type_for_name(&e)
                .map(str::to_string)
                .unwrap_or(e)
        }
    });
    let filter = scitrack_logic::view::Filter {
        body: args.body,
        experiment_type,
    };

    if args.json {
        report::print_json(&extraction, &result, &filter)
    } else {
        report::print_text(&extraction, &result, &filter, args.group_by);
        Ok(())
    }
}
