// crates/ev_cli/src/main.rs
//
// evprobe: generate elections, search each for a strategy disproof against
// one method, and report per-criterion failure counts.

mod args;
mod config;

mod exitcodes {
    pub const OK: i32 = 0;
    /// At least one trial produced a valid disproof.
    pub const FAILURES_FOUND: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const ENGINE: i32 = 4;
}

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use args::Args;
use config::{ConfigError, FileConfig, Settings};
use ev_algo::methods::{method_by_name, BASE_METHOD_NAMES};
use ev_algo::{BallotGenerator, ImpartialCulture, PairwiseKind};
use ev_search::stats::{agresti_coull, Z_95};
use ev_search::{strategy_tests, SearchError, SearchMode, TestRunner, TrialOutcome};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Bad flag combination detected after parsing.
    Usage(String),
    /// Config file unreadable/invalid, or settings out of range.
    Config(String),
    /// The search engine reported an invalid-input or invariant error.
    Engine(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Usage(m) => write!(f, "usage: {m}"),
            MainError::Config(m) => write!(f, "config: {m}"),
            MainError::Engine(m) => write!(f, "engine: {m}"),
        }
    }
}

impl From<ConfigError> for MainError {
    fn from(e: ConfigError) -> Self {
        MainError::Config(e.to_string())
    }
}

impl From<SearchError> for MainError {
    fn from(e: SearchError) -> Self {
        MainError::Engine(e.to_string())
    }
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Usage(_) => USAGE,
        MainError::Config(_) => CONFIG,
        MainError::Engine(_) => ENGINE,
    }
}

fn init_tracing(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);

    if args.list_methods {
        list_methods();
        return ExitCode::from(exitcodes::OK as u8);
    }

    let rc = match run(&args) {
        Ok(summary) if summary.failures > 0 => exitcodes::FAILURES_FOUND,
        Ok(_) => exitcodes::OK,
        Err(e) => {
            eprintln!("evprobe: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

fn list_methods() {
    for name in BASE_METHOD_NAMES {
        println!("{name}");
    }
    for kind in PairwiseKind::ALL {
        if kind != PairwiseKind::WinningVotes {
            println!("Schulze({})", kind.short_name());
        }
    }
    println!("[<set>],[<method>]  e.g. Smith,IRV");
}

// ---------- summary ----------

#[derive(Debug, Serialize)]
struct Summary {
    runner: String,
    method: String,
    seed: u64,
    mode: SearchMode,
    trials: u64,
    ties: u64,
    failures: u64,
    /// Failures over decisive (non-tied) trials.
    failure_rate: f64,
    failure_rate_95: (f64, f64),
    criteria: BTreeMap<String, u64>,
    total_generation_attempts: u64,
}

impl Summary {
    fn print_text(&self) {
        println!("{}", self.runner);
        println!("seed: {:#x}  mode: {:?}", self.seed, self.mode);
        println!("trials: {}  ties: {}", self.trials, self.ties);
        println!(
            "failures: {} ({:.1}%, 95% CI {:.1}%..{:.1}%)",
            self.failures,
            self.failure_rate * 100.0,
            self.failure_rate_95.0 * 100.0,
            self.failure_rate_95.1 * 100.0
        );
        let width = self.criteria.keys().map(String::len).max().unwrap_or(9).max(9);
        println!("{:<width$}  failures", "criterion");
        for (criterion, count) in &self.criteria {
            println!("{criterion:<width$}  {count}");
        }
    }
}

// ---------- run ----------

fn build_runner(settings: &Settings) -> Result<TestRunner, MainError> {
    let method = method_by_name(&settings.method).map_err(|e| MainError::Usage(e.to_string()))?;
    let ballots: Arc<dyn BallotGenerator> = Arc::new(ImpartialCulture::new(true, settings.truncate));
    let strategic: Arc<dyn BallotGenerator> = Arc::new(ImpartialCulture::new(false, false));

    let mut runner = TestRunner::new(settings.runner.clone(), method, ballots, strategic, settings.seed)?;
    runner.set_name("Strategy");
    for test in strategy_tests() {
        runner.add_test(test)?;
    }
    Ok(runner)
}

fn run(args: &Args) -> Result<Summary, MainError> {
    let file = match &args.config {
        Some(path) => config::load_file(path)?,
        None => FileConfig::default(),
    };
    let settings = config::resolve(args, file)?;
    let mut runner = build_runner(&settings)?;
    info!(runner = %runner.name(), trials = settings.trials, seed = settings.seed, "starting");

    let mut criteria: BTreeMap<String, u64> = runner.tests().map(|t| (t.criterion_name(), 0)).collect();
    let (mut ties, mut failures) = (0u64, 0u64);

    for trial in 0..settings.trials {
        match runner.attempt_execute_strategy()? {
            TrialOutcome::Tie => ties += 1,
            TrialOutcome::NoDisproof => {}
            TrialOutcome::DisproofFound(disproof) => {
                failures += 1;
                if args.show_disproofs && !args.json {
                    println!("--- trial {trial} ---");
                    for line in disproof.render() {
                        println!("{line}");
                    }
                }
            }
        }
        for (criterion, failed) in runner.get_failure_pattern() {
            if *failed {
                *criteria.entry(criterion.clone()).or_default() += 1;
            }
        }
        debug!(trial, ties, failures, "trial done");
    }

    let decisive = settings.trials - ties;
    let summary = Summary {
        runner: runner.name(),
        method: settings.method.clone(),
        seed: settings.seed,
        mode: settings.runner.mode,
        trials: settings.trials,
        ties,
        failures,
        failure_rate: if decisive > 0 { failures as f64 / decisive as f64 } else { 0.0 },
        failure_rate_95: agresti_coull(failures, decisive, Z_95),
        criteria,
        total_generation_attempts: runner.total_generation_attempts(),
    };

    if args.json {
        let text = serde_json::to_string_pretty(&summary).map_err(|e| MainError::Engine(format!("summary to JSON: {e}")))?;
        println!("{text}");
    } else if !args.quiet {
        summary.print_text();
    }
    Ok(summary)
}
