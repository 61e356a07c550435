//! Instant-runoff voting by repeated plurality on shrinking hopeful sets.
//!
//! Each round runs `Plurality` through the subset dispatch path and removes
//! the weakest hopeful (ties: the highest candidate id goes first, which is
//! the last entry of the plurality ordering). A candidate's score is the
//! round it was eliminated in; the winner scores highest.

use ev_core::BallotGroup;
use tracing::trace;

use crate::cache::OutcomeCache;
use crate::method::{ElectionMethod, ElectionMethodExt, MethodOutcome};
use crate::methods::Plurality;
use crate::ordering_tools::ordering_from_scores;
use crate::MethodError;

#[derive(Clone, Copy, Debug, Default)]
pub struct Irv;

impl ElectionMethod for Irv {
    fn name(&self) -> String {
        "IRV".into()
    }

    fn elect_inner(
        &self,
        election: &[BallotGroup],
        hopefuls: &[bool],
        num_candidates: usize,
        _cache: Option<&mut OutcomeCache>,
        _winner_only: bool,
    ) -> Result<MethodOutcome, MethodError> {
        let mut remaining = hopefuls.to_vec();
        let mut round_out = vec![0.0; num_candidates];
        let mut round = 0usize;

        loop {
            let left = remaining.iter().filter(|&&h| h).count();
            if left == 0 {
                break;
            }
            let tally = Plurality.elect_hopefuls(election, &remaining, num_candidates, None, false)?;
            let loser = tally
                .last()
                .map(|cs| cs.candidate())
                .ok_or(MethodError::Invariant("plurality returned an empty round"))?;
            trace!(round, loser, "irv elimination");
            round_out[loser] = round as f64;
            remaining[loser] = false;
            round += 1;
        }

        Ok(MethodOutcome::full(ordering_from_scores(&round_out, Some(hopefuls))?))
    }
}
