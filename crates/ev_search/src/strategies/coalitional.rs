//! Coalitions of challenger supporters voting generated ballots.

use ev_algo::BallotGenerator;
use ev_core::SearchRng;
use tracing::trace;

use crate::disproof::Disproof;
use crate::strategy::{resolve_challenger, Instance, Strategy, StrategyStatus, TryBudget};
use crate::support::SupportCache;
use crate::SearchError;

/// Key of the coalition count in `Disproof::data`.
pub const NUM_COALITIONS: &str = "num_coalitions";

/// Split the challenger-supporting weight across one to three coalitions,
/// each casting a single ballot drawn from the auxiliary generator.
///
/// Every coalition but the last gets `round(U[0.5, support / k))` voters,
/// capped at what is still unassigned; the last one takes the remainder.
/// When the per-coalition share is below one voter, the first coalition
/// takes everything. Weight is always conserved exactly.
#[derive(Clone, Copy, Debug, Default)]
pub struct Coalitional;

impl Strategy for Coalitional {
    fn name(&self) -> String {
        "Coalitional strategy".to_owned()
    }

    fn num_tries(&self, _num_candidates: usize) -> TryBudget {
        TryBudget::Unbounded
    }

    fn build_strategic_election(
        &self,
        disproof: &mut Disproof,
        instance: Instance,
        winner: usize,
        cache: &mut SupportCache,
        num_candidates: usize,
        generator: &dyn BallotGenerator,
        rng: &mut SearchRng,
    ) -> Result<StrategyStatus, SearchError> {
        if instance != Instance::Random {
            return Err(SearchError::RandomOnly { strategy: self.name() });
        }

        let num_coalitions = rng.next_int_between(1, 4)?;
        let challenger = resolve_challenger("Coalitional strategy", Instance::Random, winner, num_candidates, rng)?;
        let grouped = cache.grouped_by_challenger(&disproof.before_election, challenger)?;
        if grouped.challenger_support <= 0.0 {
            return Ok(StrategyStatus::NotApplicable);
        }

        let mut after = grouped.others.clone();
        let mut unassigned = grouped.challenger_support;
        let max_per_coalition = grouped.challenger_support / num_coalitions as f64;

        let mut coalition = 0;
        while coalition < num_coalitions && unassigned > 0.0 {
            let mut strategic = generator.generate_ballot(num_candidates, rng)?;
            let weight = if coalition == num_coalitions - 1 || max_per_coalition < 1.0 {
                unassigned
            } else {
                rng.next_double_between(0.5, max_per_coalition).round().min(unassigned)
            };
            strategic.set_weight(weight)?;
            unassigned -= weight;
            after.push(strategic);
            coalition += 1;
        }
        trace!(challenger, coalitions = coalition, "built coalitional election");

        disproof.after_election = after;
        disproof.set_chosen_challenger(challenger);
        disproof.data.insert(NUM_COALITIONS.to_owned(), coalition);
        Ok(StrategyStatus::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::BallotsBySupport;
    use crate::testutil::{ballot, outcome};
    use ev_algo::ballot_tools::total_weight;
    use ev_algo::ImpartialCulture;
    use proptest::prelude::*;

    fn run(weights: &[u32], seed: u64) -> (Disproof, BallotsBySupport) {
        // Every ballot prefers candidate 1 or 2 over the winner 0.
        let election: Vec<_> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let first = 1 + i % 2;
                ballot(w as f64, &[first, 3 - first, 0])
            })
            .collect();
        let mut disproof = Disproof::new("Coalitional strategy", election, outcome(&[0, 1, 2]));
        let mut cache = SupportCache::new();
        let mut rng = SearchRng::from_seed_u64(seed);
        let status = Coalitional
            .add_strategic_election(&mut disproof, Instance::Random, &mut cache, 3, &ImpartialCulture::default(), &mut rng)
            .unwrap();
        assert_eq!(status, StrategyStatus::Applied);
        let challenger = disproof.chosen_challenger().unwrap();
        let grouped = cache.grouped_by_challenger(&[], challenger).unwrap().clone();
        (disproof, grouped)
    }

    #[test]
    fn indexed_instances_are_rejected() {
        let mut disproof = Disproof::new("Coalitional strategy", vec![ballot(1.0, &[1, 0])], outcome(&[0, 1]));
        let mut cache = SupportCache::new();
        let mut rng = SearchRng::from_seed_u64(0);
        let err = Coalitional
            .add_strategic_election(&mut disproof, Instance::Index(0), &mut cache, 2, &ImpartialCulture::default(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, SearchError::RandomOnly { .. }));
    }

    #[test]
    fn records_coalition_count() {
        let (disproof, grouped) = run(&[5, 7, 3], 9);
        let k = disproof.data[NUM_COALITIONS];
        assert!((1..=3).contains(&k));
        assert_eq!(disproof.after_election.len(), grouped.others.len() + k);
    }

    proptest! {
        #[test]
        fn coalition_weights_sum_to_support(weights in prop::collection::vec(1u32..20, 1..8), seed in any::<u64>()) {
            let (disproof, grouped) = run(&weights, seed);
            let added = &disproof.after_election[grouped.others.len()..];
            prop_assert!(!added.is_empty() && added.len() <= 3);
            prop_assert_eq!(total_weight(added), grouped.challenger_support);
            prop_assert_eq!(total_weight(&disproof.after_election), total_weight(&disproof.before_election));
        }
    }
}
