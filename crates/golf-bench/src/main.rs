use std::path::PathBuf;

use clap::Parser;

use golf_bench::config::{BenchmarkConfig, ResolvedOutputs};
use golf_bench::logging::init_logging;
use golf_bench::tournament::TournamentRunner;

/// Paired-match tournament harness for Golf bots.
#[derive(Debug, Parser)]
#[command(
    name = "golf-bench",
    author,
    version,
    about = "Deterministic paired-match Golf tournament harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/golf.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of paired matches to play.
    #[arg(long, value_name = "COUNT")]
    matches: Option<usize>,

    /// Override the RNG seed for match seeds.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the generation mixed into every match seed.
    #[arg(long, value_name = "GENERATION")]
    generation: Option<u64>,

    /// Exit after validating the configuration (no tournament is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    if let Some(generation) = cli.generation {
        config.matches.generation = generation;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let matches = config.matches.count;
    let names = config
        .agents
        .iter()
        .map(|agent| format!("{} ({})", agent.name, agent.kind))
        .collect::<Vec<_>>()
        .join(" vs ");

    println!("Loaded configuration '{run_id}': {names}, {matches} paired matches");

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = TournamentRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: tournament execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Tournament complete for '{run_id}': {} matches → {} rows at {}",
        summary.matches_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for path in &summary.record_paths {
        println!("Match records: {}", path.display());
    }
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
