//! goalrec - Goal recognition from plan-cost deltas
//!
//! The `goalrec` command estimates which candidate goal an observed agent
//! is pursuing, by querying an external classical planner for optimal plan
//! costs and converting cost differences into probabilities.
//!
//! ## Commands
//!
//! - `recognize`: one distribution for one observation instant
//! - `evaluate`: walk one test's trajectories under all four
//!   (goal-path × condition) combinations
//! - `battery`: run the full numbered test battery under a common root

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use goalrec_core::{
    init_tracing, ModelConfig, PlannerConfig, RecognitionSession, ScenarioEvaluator,
    SubprocessOracle,
};

#[derive(Parser)]
#[command(name = "goalrec")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Goal recognition via plan-cost deltas", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Planner executable
    #[arg(long, global = true, default_value = "./fast-downward.py")]
    planner: PathBuf,

    /// Working directory the planner is launched in
    #[arg(long, global = true, default_value = ".")]
    workdir: PathBuf,

    /// Extra planner flag, inserted before the domain/problem arguments
    /// (repeatable; defaults to the LAMA 2011 satisficing alias)
    #[arg(long = "planner-arg", global = true)]
    planner_args: Vec<String>,

    /// Seconds before a planner run is abandoned (0 = no timeout)
    #[arg(long, global = true, default_value_t = 1800)]
    timeout_secs: u64,

    /// Sensitivity constant of the logistic scoring model
    #[arg(long, global = true, default_value_t = 1.0)]
    sensitivity: f64,

    /// Write the JSON report to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one goal distribution for one observation instant
    Recognize {
        /// Path to PDDL domain file
        #[arg(short, long)]
        domain: PathBuf,

        /// Candidate goal problem file (repeatable, index-aligned with --position)
        #[arg(short, long = "goal", required = true)]
        goals: Vec<PathBuf>,

        /// Current-position problem file for the matching goal branch (repeatable)
        #[arg(short, long = "position", required = true)]
        positions: Vec<PathBuf>,
    },

    /// Evaluate one test root across all four combinations
    Evaluate {
        /// Path to PDDL domain file
        #[arg(short, long)]
        domain: PathBuf,

        /// Test root directory (contains no-reduction/ and with-reduction/)
        #[arg(short, long)]
        test_root: PathBuf,

        /// Test number used in the report
        #[arg(long, default_value_t = 1)]
        test_id: u32,
    },

    /// Run the numbered test battery Test1..TestN
    Battery {
        /// Path to PDDL domain file
        #[arg(short, long)]
        domain: PathBuf,

        /// Directory containing the Test1..TestN roots
        #[arg(short, long)]
        tests_root: PathBuf,

        /// Number of tests in the battery
        #[arg(long, default_value_t = 6)]
        tests: u32,
    },
}

fn planner_config(cli: &Cli) -> PlannerConfig {
    let extra_args = if cli.planner_args.is_empty() {
        vec!["--alias".to_string(), "seq-sat-lama-2011".to_string()]
    } else {
        cli.planner_args.clone()
    };
    PlannerConfig {
        binary: cli.planner.clone(),
        workdir: cli.workdir.clone(),
        extra_args,
        timeout_secs: cli.timeout_secs,
    }
}

fn emit_report(output: Option<&PathBuf>, report: &impl serde::Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let oracle = Arc::new(SubprocessOracle::new(planner_config(&cli)));
    let model = ModelConfig {
        sensitivity: cli.sensitivity,
    };

    match &cli.command {
        Commands::Recognize {
            domain,
            goals,
            positions,
        } => {
            let session = RecognitionSession::new(oracle, model);
            let probabilities = session
                .distribution(domain, positions, goals)
                .await
                .context("Failed to compute goal distribution")?;

            for (goal, p) in goals.iter().zip(&probabilities) {
                println!("{}\t{p}", goal.display());
            }
            if cli.output.is_some() {
                emit_report(cli.output.as_ref(), &probabilities)?;
            }
        }

        Commands::Evaluate {
            domain,
            test_root,
            test_id,
        } => {
            let evaluator = ScenarioEvaluator::new(oracle, model);
            let report = evaluator
                .run(domain, test_root, *test_id)
                .await
                .with_context(|| format!("Test {test_id} failed"))?;
            emit_report(cli.output.as_ref(), &report)?;
        }

        Commands::Battery {
            domain,
            tests_root,
            tests,
        } => {
            let evaluator = ScenarioEvaluator::new(oracle, model);
            let reports = evaluator
                .run_battery(domain, tests_root, *tests)
                .await
                .context("Battery run failed")?;
            emit_report(cli.output.as_ref(), &reports)?;
        }
    }

    Ok(())
}
