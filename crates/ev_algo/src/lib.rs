//! ev_algo: Algorithms over the `ev_core` data model.
//!
//! - `ordering_tools`: reversal, winner extraction, rank scrubbing, tie-breaks
//! - `ballot_tools`: sorting, compression, truncation, text rendering
//! - `pairwise`: Condorcet matrix and its transformed views
//! - `cache`: per-election outcome memoization
//! - `method`: the `ElectionMethod` trait and the dispatch wrapper every call
//!   goes through (`ElectionMethodExt`)
//! - `methods`: reference methods (plurality, Borda, Copeland, Schulze, IRV,
//!   Smith, and the "Set,Method" combinator)
//! - `generator`: ballot generators
//!
//! Everything here is pure and single-threaded; randomness only enters
//! through an explicit `&mut SearchRng`.

#![forbid(unsafe_code)]

pub mod ballot_tools;
pub mod cache;
pub mod generator;
pub mod method;
pub mod methods;
pub mod ordering_tools;
pub mod pairwise;

mod errors;

pub use cache::OutcomeCache;
pub use errors::MethodError;
pub use generator::{BallotGenerator, ImpartialCulture};
pub use method::{ElectionMethod, ElectionMethodExt, MethodOutcome};
pub use pairwise::{CondorcetMatrix, PairwiseKind, PairwiseMatrix, PairwiseView};
