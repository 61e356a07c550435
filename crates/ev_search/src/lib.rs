//! ev_search: disproof search over one election at a time.
//!
//! Given an election and its tie-free honest outcome, the runner asks each
//! registered strategy to build a modified election that should help some
//! challenger, re-runs the method under test, and checks whether the
//! challenger now wins.
//!
//! - `support`: ballots-by-support partition, built once per challenger
//! - `strategy` / `strategies`: the strategy contract and its five members
//! - `disproof`: before/after evidence
//! - `runner`: `TestRunner`, the trial loop and criterion registry
//! - `registry`: lookup of the built-in strategies
//! - `stats`: interval estimates for reported failure rates
//!
//! All state lives in the runner (RNG, outcome caches) or in the trial
//! (support cache); nothing is global, so independent runners may be driven
//! from separate threads.

#![forbid(unsafe_code)]

pub mod disproof;
pub mod registry;
pub mod runner;
pub mod stats;
pub mod strategies;
pub mod strategy;
pub mod support;

mod errors;

pub use disproof::{Disproof, CHOSEN_CHALLENGER};
pub use errors::SearchError;
pub use registry::{strategy_tests, test_by_name, tests_by_category};
pub use runner::{RunnerConfig, SearchMode, TestRunner, TrialOutcome};
pub use strategy::{skip_number, BallotModifier, Instance, Strategy, StrategyStatus, TryBudget};
pub use support::{BallotsBySupport, SupportCache};
