//! Plurality: each ballot's weight goes to its top hopeful(s).
//!
//! A ballot whose top hopeful block is a tie splits its weight evenly across
//! that block. Hopefuls nobody ranks first score 0; ballots ranking no
//! hopeful at all are exhausted and count for nobody.

use ev_core::BallotGroup;

use crate::cache::OutcomeCache;
use crate::method::{ElectionMethod, MethodOutcome};
use crate::methods::{check_candidates, hopeful_blocks};
use crate::ordering_tools::ordering_from_scores;
use crate::MethodError;

#[derive(Clone, Copy, Debug, Default)]
pub struct Plurality;

/// First-preference tally over the hopefuls, indexed by candidate.
pub fn first_preferences(election: &[BallotGroup], hopefuls: &[bool]) -> Vec<f64> {
    let mut tally = vec![0.0; hopefuls.len()];
    for ballot in election {
        if let Some(top) = hopeful_blocks(ballot, hopefuls).first() {
            let share = ballot.weight() / top.len() as f64;
            for cs in top {
                tally[cs.candidate()] += share;
            }
        }
    }
    tally
}

impl ElectionMethod for Plurality {
    fn name(&self) -> String {
        "Plurality".into()
    }

    fn elect_inner(
        &self,
        election: &[BallotGroup],
        hopefuls: &[bool],
        num_candidates: usize,
        _cache: Option<&mut OutcomeCache>,
        winner_only: bool,
    ) -> Result<MethodOutcome, MethodError> {
        check_candidates(election, num_candidates)?;
        let tally = first_preferences(election, hopefuls);
        Ok(MethodOutcome {
            ordering: ordering_from_scores(&tally, Some(hopefuls))?,
            winner_only,
        })
    }
}
