use ev_algo::MethodError;
use ev_core::CoreError;
use thiserror::Error;

/// Errors that end a trial. Expected degenerate results (tied honest
/// outcome, inapplicable strategy instance) are ordinary values instead;
/// see `TrialOutcome` and `StrategyStatus`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error(transparent)]
    Method(#[from] MethodError),
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{strategy} only draws random instances")]
    RandomOnly { strategy: String },
    #[error("{strategy}: instance {index} is outside its {budget} tries")]
    InstanceOutOfRange {
        strategy: String,
        index: usize,
        budget: usize,
    },
    #[error("candidate {challenger} cannot challenge winner {winner} among {num_candidates} candidates")]
    InvalidChallenger {
        challenger: usize,
        winner: usize,
        num_candidates: usize,
    },
    #[error("duplicate test name: {0}")]
    DuplicateTest(String),
    #[error("unknown test: {0}")]
    UnknownTest(String),
    #[error("honest outcome has tied winners")]
    TiedHonestOutcome,
    #[error("support cache used before prepare")]
    CacheNotPrepared,
    #[error("disproof lacks auxiliary value `{0}`")]
    MissingAuxiliary(&'static str),
    #[error("invalid runner configuration: {0}")]
    InvalidConfig(String),
}
