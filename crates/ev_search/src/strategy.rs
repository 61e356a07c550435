//! The strategy (disproof generator) contract.

use ev_algo::ordering_tools::is_winner;
use ev_algo::BallotGenerator;
use ev_core::{BallotGroup, SearchRng};

use crate::disproof::Disproof;
use crate::support::SupportCache;
use crate::SearchError;

/// How many instances a strategy offers for one election.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TryBudget {
    Finite(usize),
    /// Draw a fresh random instance every round instead of enumerating.
    Unbounded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instance {
    Index(usize),
    Random,
}

/// Result of asking a strategy to fill in a disproof.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyStatus {
    Applied,
    /// Preconditions not met (e.g. nobody prefers the challenger); the
    /// runner moves on.
    NotApplicable,
}

/// Map `idx` in `0..n-1` onto `0..n` with `skip` left out.
#[inline]
pub fn skip_number(idx: usize, skip: usize) -> usize {
    if idx < skip {
        idx
    } else {
        idx + 1
    }
}

/// The challenger for one instance: an index enumerates the non-winners in
/// ascending order, `Random` draws one uniformly.
pub(crate) fn resolve_challenger(
    name: &str,
    instance: Instance,
    winner: usize,
    num_candidates: usize,
    rng: &mut SearchRng,
) -> Result<usize, SearchError> {
    let budget = num_candidates.saturating_sub(1);
    let idx = match instance {
        Instance::Index(i) if i < budget => i,
        Instance::Index(index) => {
            return Err(SearchError::InstanceOutOfRange {
                strategy: name.to_owned(),
                index,
                budget,
            })
        }
        Instance::Random => rng.next_int(budget)?,
    };
    Ok(skip_number(idx, winner))
}

pub trait Strategy: Send + Sync {
    fn name(&self) -> String;

    fn category(&self) -> String {
        "Strategy".to_owned()
    }

    /// Name of the criterion a method fails when this strategy succeeds.
    fn criterion_name(&self) -> String {
        format!("{} immunity", self.name())
    }

    fn num_tries(&self, num_candidates: usize) -> TryBudget {
        TryBudget::Finite(num_candidates.saturating_sub(1))
    }

    /// Fill `disproof.after_election` (and any strategy data, including the
    /// chosen challenger) from the prepared support cache.
    #[allow(clippy::too_many_arguments)]
    fn build_strategic_election(
        &self,
        disproof: &mut Disproof,
        instance: Instance,
        winner: usize,
        cache: &mut SupportCache,
        num_candidates: usize,
        generator: &dyn BallotGenerator,
        rng: &mut SearchRng,
    ) -> Result<StrategyStatus, SearchError>;

    /// Bind `cache` to the disproof's honest outcome, then build the
    /// strategic election for `instance`.
    fn add_strategic_election(
        &self,
        disproof: &mut Disproof,
        instance: Instance,
        cache: &mut SupportCache,
        num_candidates: usize,
        generator: &dyn BallotGenerator,
        rng: &mut SearchRng,
    ) -> Result<StrategyStatus, SearchError> {
        if num_candidates < 2 {
            return Ok(StrategyStatus::NotApplicable);
        }
        cache.prepare(&disproof.before_outcome, num_candidates)?;
        let winner = cache.winner()?;
        self.build_strategic_election(disproof, instance, winner, cache, num_candidates, generator, rng)
    }

    /// The challenger won afterwards and had not won before.
    fn is_disproof_valid(&self, disproof: &Disproof) -> Result<bool, SearchError> {
        let challenger = disproof.chosen_challenger()?;
        Ok(is_winner(&disproof.after_outcome, challenger) && !is_winner(&disproof.before_outcome, challenger))
    }
}

/// Ballot-level edit applied to every supporting ballot.
pub trait BallotModifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn modify_ballot(&self, ballot: &mut BallotGroup, winner: usize, challenger: usize) -> Result<(), SearchError>;
}
