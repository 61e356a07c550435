//! Ballots-by-support index and its per-election cache.
//!
//! For a (winner, challenger) pair an election splits into ballots that rank
//! the challenger strictly above the winner and everything else. Equal rank
//! counts as support for the winner, and a candidate the ballot leaves out
//! ranks below all candidates it mentions.

use ev_algo::ordering_tools::get_winners;
use ev_core::{BallotGroup, Election, Ordering};

use crate::SearchError;

#[derive(Clone, Debug, PartialEq)]
pub struct BallotsBySupport {
    pub winner: usize,
    pub challenger: usize,
    pub supporting_challenger: Election,
    pub others: Election,
    pub challenger_support: f64,
    pub other_support: f64,
}

/// Whether `ballot` ranks `challenger` strictly above `winner`. Stops
/// scanning once both have been seen.
fn prefers_challenger(ballot: &BallotGroup, winner: usize, challenger: usize) -> bool {
    let mut winner_score = f64::NEG_INFINITY;
    let mut challenger_score = f64::NEG_INFINITY;
    let (mut seen_winner, mut seen_challenger) = (false, false);

    for cs in &ballot.contents {
        if cs.candidate() == winner {
            winner_score = cs.score();
            seen_winner = true;
        } else if cs.candidate() == challenger {
            challenger_score = cs.score();
            seen_challenger = true;
        }
        if seen_winner && seen_challenger {
            break;
        }
    }
    challenger_score > winner_score
}

impl BallotsBySupport {
    pub fn group_by_support(election: &[BallotGroup], winner: usize, challenger: usize) -> Self {
        let mut out = Self {
            winner,
            challenger,
            supporting_challenger: Vec::new(),
            others: Vec::new(),
            challenger_support: 0.0,
            other_support: 0.0,
        };
        for ballot in election {
            if prefers_challenger(ballot, winner, challenger) {
                out.challenger_support += ballot.weight();
                out.supporting_challenger.push(ballot.clone());
            } else {
                out.other_support += ballot.weight();
                out.others.push(ballot.clone());
            }
        }
        out
    }
}

/// Per-election store of `BallotsBySupport`, one slot per challenger, each
/// built on first request. Shared by every strategy and instance of a trial.
#[derive(Clone, Debug, Default)]
pub struct SupportCache {
    winner: Option<usize>,
    grouped: Vec<Option<BallotsBySupport>>,
}

impl SupportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the cache to an honest outcome. A no-op once prepared; call
    /// `clear` before moving to another election.
    pub fn prepare(&mut self, honest_outcome: &Ordering, num_candidates: usize) -> Result<(), SearchError> {
        if self.winner.is_some() {
            return Ok(());
        }
        match get_winners(honest_outcome).as_slice() {
            [winner] => {
                self.winner = Some(*winner);
                self.grouped = vec![None; num_candidates];
                Ok(())
            }
            _ => Err(SearchError::TiedHonestOutcome),
        }
    }

    pub fn winner(&self) -> Result<usize, SearchError> {
        self.winner.ok_or(SearchError::CacheNotPrepared)
    }

    pub fn num_candidates(&self) -> usize {
        self.grouped.len()
    }

    /// The partition for `challenger`, built from `election` on first use.
    pub fn grouped_by_challenger(&mut self, election: &[BallotGroup], challenger: usize) -> Result<&BallotsBySupport, SearchError> {
        let winner = self.winner()?;
        let num_candidates = self.grouped.len();
        if challenger == winner || challenger >= num_candidates {
            return Err(SearchError::InvalidChallenger {
                challenger,
                winner,
                num_candidates,
            });
        }
        Ok(self.grouped[challenger].get_or_insert_with(|| BallotsBySupport::group_by_support(election, winner, challenger)))
    }

    /// Number of challengers whose partition has been built.
    pub fn built(&self) -> usize {
        self.grouped.iter().filter(|g| g.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.winner = None;
        self.grouped.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ballot, outcome};

    const A: usize = 0;
    const B: usize = 1;
    const C: usize = 2;

    #[test]
    fn groups_three_candidate_election() {
        let election = vec![ballot(2.0, &[A, B, C]), ballot(1.0, &[B, A, C])];
        let g = BallotsBySupport::group_by_support(&election, A, B);
        assert_eq!(g.challenger_support, 1.0);
        assert_eq!(g.other_support, 2.0);
        assert_eq!(g.supporting_challenger.len(), 1);
        assert_eq!(g.others.len(), 1);
    }

    #[test]
    fn ties_count_for_the_winner() {
        let mut tied = ballot(3.0, &[C, A, B]);
        tied.replace_score(B, tied.contents.score_of(A).unwrap()).unwrap();
        let g = BallotsBySupport::group_by_support(&[tied], A, B);
        assert_eq!(g.challenger_support, 0.0);
        assert_eq!(g.other_support, 3.0);
    }

    #[test]
    fn omitted_candidates_rank_last() {
        let election = vec![ballot(1.0, &[B]), ballot(4.0, &[A]), ballot(2.0, &[C])];
        let g = BallotsBySupport::group_by_support(&election, A, B);
        assert_eq!(g.challenger_support, 1.0);
        assert_eq!(g.other_support, 6.0);
    }

    #[test]
    fn cache_builds_each_challenger_once() {
        let election = vec![ballot(2.0, &[A, B, C]), ballot(1.0, &[C, B, A])];
        let mut cache = SupportCache::new();
        cache.prepare(&outcome(&[A, B, C]), 3).unwrap();
        assert_eq!(cache.winner(), Ok(A));

        let first = cache.grouped_by_challenger(&election, C).unwrap().clone();
        assert_eq!(cache.built(), 1);
        // A different election must not leak in once built.
        let again = cache.grouped_by_challenger(&[], C).unwrap();
        assert_eq!(&first, again);
        assert_eq!(cache.built(), 1);

        assert!(matches!(
            cache.grouped_by_challenger(&election, A),
            Err(SearchError::InvalidChallenger { .. })
        ));
        assert!(cache.grouped_by_challenger(&election, 3).is_err());
    }

    #[test]
    fn cache_rejects_tied_outcome_and_unprepared_use() {
        let mut cache = SupportCache::new();
        assert_eq!(cache.winner(), Err(SearchError::CacheNotPrepared));
        let mut tied = outcome(&[A, B, C]);
        tied.remove(B);
        tied.insert_score(B, tied.max_score().unwrap()).unwrap();
        assert_eq!(cache.prepare(&tied, 3), Err(SearchError::TiedHonestOutcome));
    }
}
