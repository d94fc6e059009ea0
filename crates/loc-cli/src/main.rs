//! Command-line surface over the reconciliation workflow.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use loc_compare::matcher::ProgressFn;
use loc_workflow::runner::{run, RunOptions};

#[derive(Parser, Debug)]
#[command(
    name = "loc-recon",
    version,
    about = "Reconcile two snapshots of a voice-recording localization sheet"
)]
struct Cli {
    /// PREVIOUS snapshot CSV.
    #[arg(long)]
    previous: PathBuf,

    /// CURRENT snapshot CSV.
    #[arg(long)]
    current: PathBuf,

    /// Augmented output CSV (CHANGES + PreviousData columns).
    #[arg(long, short)]
    output: PathBuf,

    /// Append a run record to this JSON Lines journal.
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Write deleted previous rows to this CSV.
    #[arg(long)]
    deleted: Option<PathBuf>,

    /// Write the aggregate report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Disable the origin-similarity annotation.
    #[arg(long)]
    no_similarity: bool,

    /// Comma-separated character-group columns (default: Tribe,Age,Gender,Job,Region).
    #[arg(long, value_delimiter = ',')]
    group_columns: Option<Vec<String>>,

    /// Print row progress to stderr while matching.
    #[arg(long)]
    progress: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut options = RunOptions::new(&cli.previous, &cli.current, &cli.output);
    options.journal_path = cli.journal.clone();
    options.deleted_path = cli.deleted.clone();
    options.annotate_similarity = !cli.no_similarity;
    if let Some(group_columns) = &cli.group_columns {
        options.group_columns = group_columns.clone();
    }

    let print_progress = |done: usize, total: usize| {
        eprint!("\r  matching {done}/{total} rows");
        if done == total {
            eprintln!();
        }
    };
    let progress: Option<&ProgressFn> = if cli.progress {
        Some(&print_progress)
    } else {
        None
    };

    let summary = run(&options, progress).context("reconciliation run failed")?;

    let stats = &summary.result.stats;
    println!("run {} ({} ms)", summary.result.run_id, summary.result.elapsed_ms);
    println!("  previous rows      {}", stats.rows_previous);
    println!("  current rows       {}", stats.rows_current);
    println!("  unchanged          {}", stats.unchanged);
    println!("  changed            {}", stats.changed);
    println!("  no relevant change {}", stats.no_relevant);
    println!("  new rows           {}", stats.new_rows);
    println!("  deleted rows       {}", stats.deleted);
    println!("labels:");
    for entry in &summary.report.labels {
        println!("  {:>6}  {}  ({} words)", entry.rows, entry.label, entry.words);
    }

    if let Some(report_path) = &cli.report {
        let json = serde_json::to_string_pretty(&summary.report)?;
        std::fs::write(report_path, json)
            .with_context(|| format!("writing report to {}", report_path.display()))?;
        info!("report written to {}", report_path.display());
    }

    info!("output written to {}", cli.output.display());
    Ok(())
}
