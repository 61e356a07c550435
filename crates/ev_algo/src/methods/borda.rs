//! Borda count over the hopefuls.
//!
//! A candidate earns one point per hopeful ranked strictly below it and half
//! a point per hopeful tied with it. Hopefuls a ballot leaves out share the
//! bottom block.

use ev_core::BallotGroup;

use crate::cache::OutcomeCache;
use crate::method::{ElectionMethod, MethodOutcome};
use crate::methods::{check_candidates, hopeful_blocks};
use crate::ordering_tools::ordering_from_scores;
use crate::MethodError;

#[derive(Clone, Copy, Debug, Default)]
pub struct Borda;

impl ElectionMethod for Borda {
    fn name(&self) -> String {
        "Borda".into()
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
        let num_hopefuls = hopefuls.iter().filter(|&&h| h).count();
        let mut points = vec![0.0; num_candidates];

        for ballot in election {
            let weight = ballot.weight();
            let mut above = 0usize;
            for block in hopeful_blocks(ballot, hopefuls) {
                let k = block.len();
                let below = num_hopefuls - above - k;
                let each = below as f64 + 0.5 * (k - 1) as f64;
                for cs in &block {
                    points[cs.candidate()] += weight * each;
                }
                above += k;
            }
            // Unranked hopefuls: all tied at the bottom.
            let unranked = num_hopefuls - above;
            if unranked > 1 {
                let mut ranked = vec![false; num_candidates];
                for cs in &ballot.contents {
                    ranked[cs.candidate()] = true;
                }
                let each = 0.5 * (unranked - 1) as f64;
                for c in (0..num_candidates).filter(|&c| hopefuls[c] && !ranked[c]) {
                    points[c] += weight * each;
                }
            }
        }

        Ok(MethodOutcome {
            ordering: ordering_from_scores(&points, Some(hopefuls))?,
            winner_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::ElectionMethodExt;
    use crate::methods::testutil::{ballot, ids};

    #[test]
    fn positional_points() {
        let election = vec![ballot(2.0, &[0, 1, 2]), ballot(1.0, &[2, 1, 0])];
        let out = Borda.elect(&election, 3, None, false).unwrap();
        assert_eq!(out.score_of(0), Some(4.0));
        assert_eq!(out.score_of(1), Some(3.0));
        assert_eq!(out.score_of(2), Some(2.0));
        assert_eq!(ids(&out), vec![0, 1, 2]);
    }

    #[test]
    fn truncated_ballots_tie_the_rest() {
        let election = vec![ballot(1.0, &[0])];
        let out = Borda.elect(&election, 3, None, false).unwrap();
        assert_eq!(out.score_of(0), Some(2.0));
        assert_eq!(out.score_of(1), Some(0.5));
        assert_eq!(out.score_of(2), Some(0.5));
    }

    #[test]
    fn hopefuls_shrink_the_scale() {
        let election = vec![ballot(1.0, &[0, 1, 2])];
        let out = Borda
            .elect_hopefuls(&election, &[true, false, true], 3, None, false)
            .unwrap();
        assert_eq!(out.score_of(0), Some(1.0));
        assert_eq!(out.score_of(2), Some(0.0));
        assert_eq!(out.len(), 2);
    }
}
