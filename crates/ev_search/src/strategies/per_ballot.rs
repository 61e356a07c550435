//! Strategies that edit each supporting ballot independently.

use ev_algo::BallotGenerator;
use ev_core::{BallotGroup, SearchRng};
use tracing::trace;

use crate::disproof::Disproof;
use crate::strategy::{resolve_challenger, BallotModifier, Instance, Strategy, StrategyStatus};
use crate::support::SupportCache;
use crate::SearchError;

/// Lower the winner below every rank the voter uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct Burial;

/// Raise the challenger above every rank the voter uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct Compromising;

/// Burial and compromising on the same ballot.
#[derive(Clone, Copy, Debug, Default)]
pub struct TwoSided;

pub(crate) fn bury(ballot: &mut BallotGroup, winner: usize) -> Result<(), SearchError> {
    if !ballot.contents.contains(winner) {
        return Ok(());
    }
    if let Some(min) = ballot.min_score() {
        ballot.replace_score(winner, min - 1.0)?;
    }
    Ok(())
}

pub(crate) fn compromise(ballot: &mut BallotGroup, challenger: usize) -> Result<(), SearchError> {
    if let Some(max) = ballot.max_score() {
        if ballot.contents.contains(challenger) {
            ballot.replace_score(challenger, max + 1.0)?;
        } else {
            ballot.contents.insert_score(challenger, max + 1.0)?;
        }
    }
    Ok(())
}

impl BallotModifier for Burial {
    fn name(&self) -> &'static str {
        "Burial"
    }

    fn modify_ballot(&self, ballot: &mut BallotGroup, winner: usize, _challenger: usize) -> Result<(), SearchError> {
        bury(ballot, winner)
    }
}

impl BallotModifier for Compromising {
    fn name(&self) -> &'static str {
        "Compromising"
    }

    fn modify_ballot(&self, ballot: &mut BallotGroup, _winner: usize, challenger: usize) -> Result<(), SearchError> {
        compromise(ballot, challenger)
    }
}

impl BallotModifier for TwoSided {
    fn name(&self) -> &'static str {
        "Two-sided"
    }

    fn modify_ballot(&self, ballot: &mut BallotGroup, winner: usize, challenger: usize) -> Result<(), SearchError> {
        bury(ballot, winner)?;
        compromise(ballot, challenger)
    }
}

/// A strategy that applies `M` to every ballot preferring the challenger and
/// passes the other ballots through. One instance per challenger.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerBallot<M>(pub M);

impl<M: BallotModifier> Strategy for PerBallot<M> {
    fn name(&self) -> String {
        self.0.name().to_owned()
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
        let challenger = resolve_challenger(self.0.name(), instance, winner, num_candidates, rng)?;
        let grouped = cache.grouped_by_challenger(&disproof.before_election, challenger)?;
        if grouped.supporting_challenger.is_empty() {
            return Ok(StrategyStatus::NotApplicable);
        }

        let mut after = grouped.others.clone();
        after.reserve(grouped.supporting_challenger.len());
        for ballot in &grouped.supporting_challenger {
            let mut modified = ballot.clone();
            self.0.modify_ballot(&mut modified, winner, challenger)?;
            after.push(modified);
        }
        trace!(strategy = self.0.name(), challenger, ballots = after.len(), "built strategic election");

        disproof.after_election = after;
        disproof.set_chosen_challenger(challenger);
        Ok(StrategyStatus::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ballot;
    use ev_core::Ordering;

    const A: usize = 0;
    const B: usize = 1;
    const C: usize = 2;

    fn position(contents: &Ordering, c: usize) -> usize {
        contents.candidates().position(|x| x == c).unwrap()
    }

    #[test]
    fn burial_sinks_the_winner_only() {
        let mut b = ballot(5.0, &[A, B, C]);
        Burial.modify_ballot(&mut b, A, B).unwrap();
        assert!(b.contents.score_of(A).unwrap() < b.contents.score_of(C).unwrap());
        assert!(position(&b.contents, B) < position(&b.contents, C));
        assert_eq!(b.weight(), 5.0);
    }

    #[test]
    fn burial_ignores_ballots_without_the_winner() {
        let mut b = ballot(1.0, &[B, C]);
        let before = b.clone();
        Burial.modify_ballot(&mut b, A, B).unwrap();
        assert_eq!(b, before);
    }

    #[test]
    fn compromising_lifts_the_challenger() {
        let mut b = ballot(2.0, &[C, A, B]);
        Compromising.modify_ballot(&mut b, A, B).unwrap();
        assert_eq!(b.contents.first().unwrap().candidate(), B);
        assert_eq!(b.contents.len(), 3);

        let mut short = ballot(1.0, &[C]);
        Compromising.modify_ballot(&mut short, A, B).unwrap();
        assert_eq!(short.contents.candidates().collect::<Vec<_>>(), vec![B, C]);
    }

    #[test]
    fn two_sided_moves_both_ends() {
        let mut b = ballot(1.0, &[A, C, B]);
        TwoSided.modify_ballot(&mut b, A, B).unwrap();
        assert_eq!(b.contents.candidates().collect::<Vec<_>>(), vec![B, C, A]);
    }

    #[test]
    fn names_and_criteria() {
        assert_eq!(PerBallot(Burial).name(), "Burial");
        assert_eq!(PerBallot(TwoSided).criterion_name(), "Two-sided immunity");
        assert_eq!(PerBallot(Compromising).category(), "Strategy");
    }
}
