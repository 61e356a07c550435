//! ev_core: Ballot/ordering data model, core errors, and deterministic RNG.
//!
//! This crate is **I/O-free**. It defines the types every election method,
//! generator and strategy in the engine (`ev_algo`, `ev_search`, `ev_cli`)
//! agrees on:
//!
//! - `CandidateScore`: the atomic (candidate, finite score) datum
//! - `Ordering`: tie-aware ranking, best first, ties by ascending candidate
//! - `BallotGroup` / `Election`: weighted orderings
//! - `SearchRng`: seedable ChaCha20 stream; the only randomness source
//!
//! Serialization derives are gated behind the `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for data-model validation.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        NonFiniteScore,
        NonPositiveWeight,
        UnknownCandidate(usize),
        DuplicateCandidate(usize),
        EmptyRange,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::NonFiniteScore => write!(f, "score must be finite"),
                CoreError::NonPositiveWeight => write!(f, "ballot weight must be positive and finite"),
                CoreError::UnknownCandidate(c) => write!(f, "candidate {c} is not in the ordering"),
                CoreError::DuplicateCandidate(c) => write!(f, "candidate {c} already present"),
                CoreError::EmptyRange => write!(f, "empty random range"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod ballot;
pub mod ordering;
pub mod rng;

pub use ballot::{BallotGroup, Election};
pub use errors::CoreError;
pub use ordering::{CandidateScore, Ordering};
pub use rng::SearchRng;
