//! Copeland: one point per pairwise win, half a point per pairwise tie,
//! counted among the hopefuls only.

use ev_core::BallotGroup;

use crate::cache::OutcomeCache;
use crate::method::{ElectionMethod, MethodOutcome};
use crate::methods::hopeful_ids;
use crate::ordering_tools::ordering_from_scores;
use crate::pairwise::{reference_matrix, PairwiseMatrix};
use crate::MethodError;

#[derive(Clone, Copy, Debug, Default)]
pub struct Copeland;

impl ElectionMethod for Copeland {
    fn name(&self) -> String {
        "Copeland".into()
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

        let mut points = vec![0.0; num_candidates];
        for &a in &ids {
            for &b in ids.iter().filter(|&&b| b != a) {
                let (ab, ba) = (matrix.get(a, b), matrix.get(b, a));
                if ab > ba {
                    points[a] += 1.0;
                } else if ab == ba {
                    points[a] += 0.5;
                }
            }
        }

        Ok(MethodOutcome {
            ordering: ordering_from_scores(&points, Some(hopefuls))?,
            winner_only,
        })
    }
}
