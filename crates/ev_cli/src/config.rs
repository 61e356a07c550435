//! Run settings: built-in defaults, overlaid by an optional JSON file,
//! overlaid by command-line flags.

use std::fs;
use std::path::Path;

use ev_search::{RunnerConfig, SearchMode};
use serde::Deserialize;
use tracing::warn;

use crate::args::Args;

pub const DEFAULT_METHOD: &str = "Plurality";
pub const DEFAULT_TRIALS: u64 = 100;
pub const DEFAULT_SEED: u64 = 1;

/// Shape of the `--config` file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub method: Option<String>,
    pub trials: Option<u64>,
    pub seed: Option<u64>,
    pub truncate: Option<bool>,
    pub voters: Option<usize>,
    pub candidates: Option<usize>,
    pub max_candidates: Option<usize>,
    pub attempts: Option<usize>,
    pub mode: Option<SearchMode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub method: String,
    pub trials: u64,
    pub seed: u64,
    pub truncate: bool,
    pub runner: RunnerConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Read(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(s) => write!(f, "read config: {s}"),
            ConfigError::Parse(s) => write!(f, "parse config: {s}"),
            ConfigError::Invalid(s) => write!(f, "invalid settings: {s}"),
        }
    }
}
impl std::error::Error for ConfigError {}

pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Read(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text).map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))
}

/// Merge flags over the file over defaults, then validate.
pub fn resolve(args: &Args, file: FileConfig) -> Result<Settings, ConfigError> {
    let defaults = RunnerConfig::default();

    let min_candidates = args.candidates.or(file.candidates).unwrap_or(defaults.min_candidates);
    let max_candidates = match (args.max_candidates, file.max_candidates) {
        (Some(max), _) => max,
        (None, Some(max)) if args.candidates.is_some_and(|c| c > max) => {
            warn!(candidates = min_candidates, file_max = max, "config max_candidates below --candidates; using --candidates");
            min_candidates
        }
        (None, Some(max)) => max,
        (None, None) => min_candidates,
    };

    let runner = RunnerConfig {
        num_voters: args.voters.or(file.voters).unwrap_or(defaults.num_voters),
        min_candidates,
        max_candidates,
        attempts_per_trial: args.attempts.or(file.attempts).unwrap_or(defaults.attempts_per_trial),
        mode: args.mode.map(SearchMode::from).or(file.mode).unwrap_or(defaults.mode),
    };
    runner.validate().map_err(|e| ConfigError::Invalid(e.to_string()))?;

    let trials = args.trials.or(file.trials).unwrap_or(DEFAULT_TRIALS);
    if trials == 0 {
        return Err(ConfigError::Invalid("trials must be positive".into()));
    }

    Ok(Settings {
        method: args.method.clone().or(file.method).unwrap_or_else(|| DEFAULT_METHOD.to_owned()),
        trials,
        seed: args.seed.or(file.seed).unwrap_or(DEFAULT_SEED),
        truncate: args.truncate || file.truncate.unwrap_or(false),
        runner,
    })
}
