//! Orb Simulator CLI
//!
//! Run a performer roster round by round and print its transcript.

use clap::Parser;
use orb_env::OrbError;
use orb_sim::scenarios::ScenarioId;
use orb_sim::{RosterConfig, RunExport, RunResult, StageRunner, Transcript, DEFAULT_MAX_METER};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Orb round-driven word exchange simulator
#[derive(Parser, Debug)]
#[command(name = "orb-sim")]
#[command(about = "Run a roster of performers until every script is spoken", long_about = None)]
struct Args {
    /// Master seed for meter assignment (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Built-in roster to run (ensemble, duet, ring)
    #[arg(short = 'S', long, default_value = "ensemble")]
    scenario: String,

    /// Roster JSON file (overrides --scenario)
    #[arg(short, long)]
    roster: Option<String>,

    /// Stop after this many rounds (0 = no limit)
    #[arg(short, long, default_value = "10000")]
    max_rounds: u64,

    /// Largest randomly assigned meter
    #[arg(long, default_value_t = DEFAULT_MAX_METER)]
    max_meter: u64,

    /// Run the speak phase as one task per performer
    #[arg(long)]
    concurrent: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output instead of the transcript table
    #[arg(long)]
    json: bool,

    /// Export the run to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn load_roster(args: &Args) -> Result<(String, RosterConfig), OrbError> {
    match &args.roster {
        Some(path) => Ok((path.clone(), RosterConfig::load(path)?)),
        None => {
            let scenario: ScenarioId = args.scenario.parse()?;
            info!("{}: {}", scenario.name(), scenario.description());
            Ok((scenario.name().to_string(), scenario.roster()))
        }
    }
}

fn run(args: &Args, seed: u64) -> Result<RunResult, OrbError> {
    let (name, config) = load_roster(args)?;
    let max_rounds = (args.max_rounds > 0).then_some(args.max_rounds);

    let runner = StageRunner::new(seed)
        .with_max_rounds(max_rounds)
        .with_max_meter(args.max_meter)
        .with_concurrent(args.concurrent);

    let transcript = Transcript::new(config.ids());
    if !args.json {
        println!("{}", transcript.header());
    }

    let result = runner.run_with(&name, &config, |report| {
        if !args.json {
            println!("{}", transcript.report_row(report));
        }
    })?;

    if let Some(path) = &args.export {
        let mut export = RunExport::new(&result.scenario, result.seed).with_meters(result.meters.clone());
        for report in &result.reports {
            export.add_round(report);
        }
        export.finalize(result.outcome);
        export.write_to_file(path)?;
        info!("Exported {} rounds to {}", export.rounds.len(), path);
    }

    Ok(result)
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    // Determine seed
    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };

    let result = match run(&args, seed) {
        Ok(result) => result,
        Err(e) => {
            error!("{}", e);
            if matches!(e, OrbError::UnknownScenario(_)) {
                eprintln!("Available scenarios: ensemble, duet, ring");
            }
            std::process::exit(1);
        }
    };

    if args.json {
        let summary = serde_json::json!({
            "scenario": result.scenario,
            "seed": result.seed,
            "finished": result.finished(),
            "rounds": result.total_rounds(),
            "meters": result.meters,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to encode summary: {}", e),
        }
    } else if result.finished() {
        info!("✓ {} (seed={}) finished in {} rounds", result.scenario, result.seed, result.total_rounds());
    } else {
        error!("✗ {} (seed={}) did not finish within {} rounds", result.scenario, result.seed, result.total_rounds());
    }

    // Exit with proper code for CI
    if !result.finished() {
        std::process::exit(1);
    }
}
