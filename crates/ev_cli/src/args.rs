//! Command-line surface for `evprobe`.
//!
//! Every run parameter is optional here; unset flags fall back to the
//! `--config` file and then to built-in defaults (see `config.rs`).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ev_search::SearchMode;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "evprobe",
    disable_help_subcommand = true,
    about = "Search an election method for strategy-criterion failures"
)]
pub struct Args {
    // --- What to test ---
    /// Method name, e.g. Plurality, IRV, Schulze(wv), "Smith,IRV".
    #[arg(long)]
    pub method: Option<String>,

    /// List the accepted method names and exit.
    #[arg(long)]
    pub list_methods: bool,

    // --- Election shape ---
    /// Voters per generated election.
    #[arg(long)]
    pub voters: Option<usize>,
    /// Candidates per election (minimum when --max-candidates is given).
    #[arg(long)]
    pub candidates: Option<usize>,
    /// Upper bound for a random candidate count.
    #[arg(long)]
    pub max_candidates: Option<usize>,
    /// Generate truncated ballots.
    #[arg(long)]
    pub truncate: bool,

    // --- Search ---
    /// Number of generated elections.
    #[arg(long)]
    pub trials: Option<u64>,
    /// Strategy attempts per election.
    #[arg(long)]
    pub attempts: Option<usize>,
    /// Stop at the first failure or probe every criterion.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
    /// RNG seed. Accepts decimal u64 or 0x-hex (≤16 hex digits).
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,
    /// JSON file with defaults for the flags above.
    #[arg(long)]
    pub config: Option<PathBuf>,

    // --- Output ---
    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
    /// Print the first disproof of every failing trial.
    #[arg(long)]
    pub show_disproofs: bool,
    /// Only log errors.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Log each strategy attempt.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Any,
    Exhaustive,
}

impl From<ModeArg> for SearchMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Any => SearchMode::AnyFailure,
            ModeArg::Exhaustive => SearchMode::Exhaustive,
        }
    }
}

/// Seed parser: decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>().map_err(|_| "decimal seed must be a valid u64".into())
    }
}
