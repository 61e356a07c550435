use ev_core::CoreError;
use thiserror::Error;

/// Errors raised while evaluating an election method.
///
/// The first group is invalid input (a caller bug); `CardinalityMismatch`,
/// `NonCanonicalMatrix` and `Invariant` flag a broken method implementation.
/// None of them are retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MethodError {
    #[error("election has no candidates")]
    NoCandidates,
    #[error("no hopeful candidates")]
    NoHopefuls,
    #[error("hopefuls vector has {got} entries, expected {expected}")]
    HopefulsSizeMismatch { expected: usize, got: usize },
    #[error("candidate {candidate} out of range for {num_candidates} candidates")]
    CandidateOutOfRange { candidate: usize, num_candidates: usize },
    #[error("unknown election method: {0}")]
    UnknownMethod(String),

    #[error("{method} returned {got} candidates, expected {expected}")]
    CardinalityMismatch {
        method: String,
        expected: usize,
        got: usize,
    },
    #[error("condorcet cache only stores pairwise opposition matrices, got {0}")]
    NonCanonicalMatrix(&'static str),
    #[error("invariant violated: {0}")]
    Invariant(&'static str),

    #[error(transparent)]
    Core(#[from] CoreError),
}
