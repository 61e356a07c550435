//! The trial runner: generate an election, find its honest outcome, then
//! search for a disproof with every registered strategy.

use std::collections::BTreeMap;
use std::sync::Arc;

use ev_algo::ordering_tools::has_multiple_winners;
use ev_algo::{BallotGenerator, ElectionMethod, ElectionMethodExt, OutcomeCache};
use ev_core::{BallotGroup, Ordering, SearchRng};
use tracing::{debug, info, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::disproof::Disproof;
use crate::strategy::{Instance, Strategy, StrategyStatus, TryBudget};
use crate::support::SupportCache;
use crate::SearchError;

// ---------- configuration ----------

/// When the search for one election stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SearchMode {
    /// Stop at the first valid disproof.
    #[default]
    AnyFailure,
    /// Keep probing criteria that have not failed yet.
    Exhaustive,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct RunnerConfig {
    pub num_voters: usize,
    pub min_candidates: usize,
    /// Candidate count is drawn from `min_candidates..=max_candidates`.
    pub max_candidates: usize,
    /// Strategy attempts per generated election.
    pub attempts_per_trial: usize,
    pub mode: SearchMode,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            num_voters: 29,
            min_candidates: 3,
            max_candidates: 3,
            attempts_per_trial: 64,
            mode: SearchMode::AnyFailure,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.num_voters == 0 {
            return Err(SearchError::InvalidConfig("num_voters must be positive".into()));
        }
        if self.min_candidates < 2 {
            return Err(SearchError::InvalidConfig("min_candidates must be at least 2".into()));
        }
        if self.min_candidates > self.max_candidates {
            return Err(SearchError::InvalidConfig(format!(
                "min_candidates ({}) exceeds max_candidates ({})",
                self.min_candidates, self.max_candidates
            )));
        }
        if self.attempts_per_trial == 0 {
            return Err(SearchError::InvalidConfig("attempts_per_trial must be positive".into()));
        }
        Ok(())
    }
}

// ---------- results ----------

#[derive(Clone, Debug, PartialEq)]
pub enum TrialOutcome {
    /// The honest outcome had more than one winner; nothing was searched.
    Tie,
    NoDisproof,
    /// The first valid disproof of the trial.
    DisproofFound(Box<Disproof>),
}

impl TrialOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TrialOutcome::DisproofFound(_))
    }
}

// ---------- runner ----------

pub struct TestRunner {
    name: String,
    config: RunnerConfig,
    method: Arc<dyn ElectionMethod>,
    ballot_generator: Arc<dyn BallotGenerator>,
    strategy_generator: Arc<dyn BallotGenerator>,
    tests: Vec<Box<dyn Strategy>>,
    rng: SearchRng,
    honest_cache: OutcomeCache,
    after_cache: OutcomeCache,
    failure_pattern: BTreeMap<String, bool>,
    last_disproofs: Vec<Disproof>,
    total_generation_attempts: u64,
}

impl std::fmt::Debug for TestRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRunner")
            .field("name", &self.name())
            .field("config", &self.config)
            .field("tests", &self.tests.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field("total_generation_attempts", &self.total_generation_attempts)
            .finish_non_exhaustive()
    }
}

impl TestRunner {
    pub fn new(
        config: RunnerConfig,
        method: Arc<dyn ElectionMethod>,
        ballot_generator: Arc<dyn BallotGenerator>,
        strategy_generator: Arc<dyn BallotGenerator>,
        seed: u64,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            name: "Criterion test".to_owned(),
            config,
            method,
            ballot_generator,
            strategy_generator,
            tests: Vec::new(),
            rng: SearchRng::from_seed_u64(seed),
            honest_cache: OutcomeCache::new(),
            after_cache: OutcomeCache::new(),
            failure_pattern: BTreeMap::new(),
            last_disproofs: Vec::new(),
            total_generation_attempts: 0,
        })
    }

    /// Register a strategy; names must be unique.
    pub fn add_test(&mut self, test: Box<dyn Strategy>) -> Result<(), SearchError> {
        let name = test.name();
        if self.tests.iter().any(|t| t.name() == name) {
            return Err(SearchError::DuplicateTest(name));
        }
        self.tests.push(test);
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// `"<runner name> (<method name>)"`.
    pub fn name(&self) -> String {
        format!("{} ({})", self.name, self.method.name())
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn tests(&self) -> impl Iterator<Item = &dyn Strategy> + '_ {
        self.tests.iter().map(|t| t.as_ref())
    }

    pub fn total_generation_attempts(&self) -> u64 {
        self.total_generation_attempts
    }

    /// Criterion name → failed, for the most recent trial. Only complete
    /// after an exhaustive search; in any-failure mode the search stops at
    /// the first failed criterion.
    pub fn get_failure_pattern(&self) -> &BTreeMap<String, bool> {
        &self.failure_pattern
    }

    pub fn get_num_failed_criteria(&self) -> usize {
        self.failure_pattern.values().filter(|&&failed| failed).count()
    }

    /// Valid disproofs found in the most recent trial, in discovery order.
    pub fn last_disproofs(&self) -> &[Disproof] {
        &self.last_disproofs
    }

    fn reset_trial_state(&mut self) {
        self.last_disproofs.clear();
        self.failure_pattern = self.tests.iter().map(|t| (t.criterion_name(), false)).collect();
    }

    /// Search for a disproof against `honest_outcome` of `election`.
    ///
    /// Strategies are visited round-robin. A strategy with a finite budget
    /// enumerates its instances and is retired once they run out; an
    /// unbounded one draws a random instance every round. The search ends
    /// when `attempts_per_trial` attempts have been made, every strategy is
    /// retired, or the mode's stopping rule fires.
    pub fn strategize_for_election(
        &mut self,
        election: &[BallotGroup],
        honest_outcome: Ordering,
        num_candidates: usize,
    ) -> Result<TrialOutcome, SearchError> {
        self.reset_trial_state();
        if honest_outcome.is_empty() || has_multiple_winners(&honest_outcome) {
            return Ok(TrialOutcome::Tie);
        }

        let mode = self.config.mode;
        let attempts = self.config.attempts_per_trial;
        let mut support = SupportCache::new();
        let mut disproof = Disproof::new(String::new(), election.to_vec(), honest_outcome);
        let mut tried = vec![0usize; self.tests.len()];
        let mut failed = vec![false; self.tests.len()];
        let mut iteration = 0usize;
        let mut exhausted = false;

        while iteration < attempts && !exhausted {
            exhausted = true;

            for (i, test) in self.tests.iter().enumerate() {
                if iteration >= attempts {
                    break;
                }
                if failed[i] {
                    continue;
                }
                let instance = match test.num_tries(num_candidates) {
                    TryBudget::Unbounded => Instance::Random,
                    TryBudget::Finite(budget) if tried[i] < budget => {
                        tried[i] += 1;
                        Instance::Index(tried[i] - 1)
                    }
                    TryBudget::Finite(_) => continue,
                };
                exhausted = false;
                iteration += 1;

                disproof.disprover_name = test.name();
                disproof.data.clear();
                let status = test.add_strategic_election(
                    &mut disproof,
                    instance,
                    &mut support,
                    num_candidates,
                    self.strategy_generator.as_ref(),
                    &mut self.rng,
                )?;
                if status == StrategyStatus::NotApplicable {
                    trace!(strategy = %disproof.disprover_name, ?instance, "not applicable");
                    continue;
                }
                debug!(strategy = %disproof.disprover_name, ?instance, iteration, "trying strategy");

                // Ties at the top count: the challenger was not a winner before.
                self.after_cache.clear();
                disproof.after_outcome =
                    self.method
                        .elect(&disproof.after_election, num_candidates, Some(&mut self.after_cache), true)?;

                if !test.is_disproof_valid(&disproof)? {
                    continue;
                }
                let criterion = test.criterion_name();
                info!(method = %self.method.name(), %criterion, "disproof found");
                failed[i] = true;
                self.failure_pattern.insert(criterion, true);
                self.last_disproofs.push(disproof.clone());

                if mode == SearchMode::AnyFailure || failed.iter().all(|&f| f) {
                    return Ok(TrialOutcome::DisproofFound(Box::new(disproof)));
                }
            }
        }

        match self.last_disproofs.first() {
            Some(first) => Ok(TrialOutcome::DisproofFound(Box::new(first.clone()))),
            None => {
                debug!(method = %self.method.name(), iteration, "no disproof found");
                Ok(TrialOutcome::NoDisproof)
            }
        }
    }

    /// One full trial: draw the candidate count, generate an election,
    /// compute its honest outcome, then search.
    pub fn attempt_execute_strategy(&mut self) -> Result<TrialOutcome, SearchError> {
        let RunnerConfig {
            num_voters,
            min_candidates,
            max_candidates,
            ..
        } = self.config;
        let num_candidates = if max_candidates > min_candidates {
            self.rng.next_int_between(min_candidates, max_candidates + 1)?
        } else {
            min_candidates
        };

        let election = self.ballot_generator.generate_ballots(num_voters, num_candidates, &mut self.rng)?;
        self.honest_cache.clear();
        // Full ranking: two-sided reverse needs more than the winner.
        let honest = self.method.elect(&election, num_candidates, Some(&mut self.honest_cache), false)?;
        self.total_generation_attempts += 1;

        if has_multiple_winners(&honest) {
            debug!(method = %self.method.name(), num_candidates, "honest outcome tied");
        }
        self.strategize_for_election(&election, honest, num_candidates)
    }

    /// 1.0 when the trial found a disproof, otherwise 0.0 (ties included).
    pub fn perform_test(&mut self) -> Result<f64, SearchError> {
        Ok(match self.attempt_execute_strategy()? {
            TrialOutcome::DisproofFound(_) => 1.0,
            TrialOutcome::Tie | TrialOutcome::NoDisproof => 0.0,
        })
    }

    /// Run one exhaustive trial and return which criteria failed. A tied
    /// election yields an empty pattern.
    pub fn calculate_failure_pattern(&mut self) -> Result<BTreeMap<String, bool>, SearchError> {
        let saved = self.config.mode;
        self.config.mode = SearchMode::Exhaustive;
        let outcome = self.attempt_execute_strategy();
        self.config.mode = saved;

        match outcome? {
            TrialOutcome::Tie => Ok(BTreeMap::new()),
            _ => Ok(self.failure_pattern.clone()),
        }
    }
}
