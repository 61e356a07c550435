//! Smith set as a ranking.
//!
//! Each hopeful scores the number of hopefuls it reaches through chains of
//! pairwise wins or ties (itself included). The Smith set, the smallest set
//! beating everyone outside it, is exactly the block that reaches everyone,
//! so it is the top of the ordering.

use ev_core::BallotGroup;

use crate::cache::OutcomeCache;
use crate::method::{ElectionMethod, MethodOutcome};
use crate::methods::hopeful_ids;
use crate::ordering_tools::ordering_from_scores;
use crate::pairwise::{reference_matrix, PairwiseMatrix};
use crate::MethodError;

#[derive(Clone, Copy, Debug, Default)]
pub struct SmithSet;

impl ElectionMethod for SmithSet {
    fn name(&self) -> String {
        "Smith".into()
    }

    fn elect_inner(
        &self,
        election: &[BallotGroup],
        hopefuls: &[bool],
        num_candidates: usize,
        cache: Option<&mut OutcomeCache>,
        winner_only: bool,
    ) -> Result<MethodOutcome, MethodError> {
        let mut scratch = None;
        let matrix = reference_matrix(election, num_candidates, cache, &mut scratch)?;
        let ids = hopeful_ids(hopefuls);
        let n = num_candidates;

        // reach[a][b]: a beats or ties b, then transitive closure.
        let mut reach = vec![false; n * n];
        for &a in &ids {
            for &b in &ids {
                reach[a * n + b] = a == b || matrix.get(a, b) >= matrix.get(b, a);
            }
        }
        for &k in &ids {
            for &i in &ids {
                if !reach[i * n + k] {
                    continue;
                }
                for &j in &ids {
                    if reach[k * n + j] {
                        reach[i * n + j] = true;
                    }
                }
            }
        }

        let mut reached = vec![0.0; n];
        for &a in &ids {
            reached[a] = ids.iter().filter(|&&b| reach[a * n + b]).count() as f64;
        }

        Ok(MethodOutcome {
            ordering: ordering_from_scores(&reached, Some(hopefuls))?,
            winner_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::ElectionMethodExt;
    use crate::methods::testutil::ballot;
    use crate::ordering_tools::get_winners;

    #[test]
    fn cycle_plus_condorcet_loser() {
        // 0 > 1 > 2 > 0 cycle, all of them beat 3.
        let election = vec![
            ballot(1.0, &[0, 1, 2, 3]),
            ballot(1.0, &[1, 2, 0, 3]),
            ballot(1.0, &[2, 0, 1, 3]),
        ];
        let out = SmithSet.elect(&election, 4, None, false).unwrap();
        assert_eq!(get_winners(&out), vec![0, 1, 2]);
        assert_eq!(out.score_of(3), Some(1.0));
    }

    #[test]
    fn condorcet_winner_is_alone() {
        let election = vec![ballot(2.0, &[1, 0, 2]), ballot(1.0, &[0, 2, 1])];
        let out = SmithSet.elect(&election, 3, None, false).unwrap();
        assert_eq!(get_winners(&out), vec![1]);
    }
}
