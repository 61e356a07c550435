//! The whole challenger faction coordinates on one ballot.

use ev_algo::ordering_tools::reverse;
use ev_algo::BallotGenerator;
use ev_core::{BallotGroup, SearchRng};

use super::per_ballot::{bury, compromise};
use crate::disproof::Disproof;
use crate::strategy::{resolve_challenger, Instance, Strategy, StrategyStatus};
use crate::support::SupportCache;
use crate::SearchError;

/// Replace every supporting ballot with a single ballot, weighted at the
/// total challenger support, that reverses the honest outcome with the
/// challenger uniquely first and the winner uniquely last.
///
/// With an honest outcome `W > A > B > C = D` and challenger `B`, the
/// faction votes `B > C = D > A > W`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TwoSidedReverse;

impl Strategy for TwoSidedReverse {
    fn name(&self) -> String {
        "Two-sided reverse".to_owned()
    }

    fn build_strategic_election(
        &self,
        disproof: &mut Disproof,
        instance: Instance,
        winner: usize,
        cache: &mut SupportCache,
        num_candidates: usize,
        _generator: &dyn BallotGenerator,
        rng: &mut SearchRng,
    ) -> Result<StrategyStatus, SearchError> {
        let challenger = resolve_challenger("Two-sided reverse", instance, winner, num_candidates, rng)?;
        let grouped = cache.grouped_by_challenger(&disproof.before_election, challenger)?;
        if grouped.challenger_support <= 0.0 {
            return Ok(StrategyStatus::NotApplicable);
        }

        let mut strategic = BallotGroup::new(grouped.challenger_support, reverse(&disproof.before_outcome), true, false)?;
        bury(&mut strategic, winner)?;
        // A winner-only honest outcome may not mention the challenger.
        compromise(&mut strategic, challenger)?;

        let mut after = grouped.others.clone();
        after.push(strategic);
        disproof.after_election = after;
        disproof.set_chosen_challenger(challenger);
        Ok(StrategyStatus::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ballot, outcome};
    use ev_algo::ballot_tools::total_weight;
    use ev_algo::ImpartialCulture;

    #[test]
    fn faction_votes_reversed_outcome() {
        // Winner 0, honest outcome 0 > 1 > 2 > 3.
        let election = vec![
            ballot(4.0, &[0, 1, 2, 3]),
            ballot(2.0, &[2, 0, 1, 3]),
            ballot(1.0, &[2, 3, 1, 0]),
        ];
        let mut disproof = Disproof::new("Two-sided reverse", election, outcome(&[0, 1, 2, 3]));
        let mut cache = SupportCache::new();
        let mut rng = SearchRng::from_seed_u64(1);

        // Index 1 skips the winner and targets candidate 2.
        let status = TwoSidedReverse
            .add_strategic_election(&mut disproof, Instance::Index(1), &mut cache, 4, &ImpartialCulture::default(), &mut rng)
            .unwrap();
        assert_eq!(status, StrategyStatus::Applied);
        assert_eq!(disproof.chosen_challenger(), Ok(2));
        assert_eq!(disproof.after_election.len(), 2);
        assert_eq!(total_weight(&disproof.after_election), 7.0);

        let strategic = disproof.after_election.last().unwrap();
        assert_eq!(strategic.weight(), 3.0);
        assert_eq!(strategic.contents.candidates().collect::<Vec<_>>(), vec![2, 3, 1, 0]);
    }

    #[test]
    fn no_supporters_is_not_applicable() {
        let election = vec![ballot(3.0, &[0, 1])];
        let mut disproof = Disproof::new("Two-sided reverse", election, outcome(&[0, 1]));
        let mut cache = SupportCache::new();
        let mut rng = SearchRng::from_seed_u64(1);
        let status = TwoSidedReverse
            .add_strategic_election(&mut disproof, Instance::Index(0), &mut cache, 2, &ImpartialCulture::default(), &mut rng)
            .unwrap();
        assert_eq!(status, StrategyStatus::NotApplicable);
    }
}
