//! Schulze (beatpath) over a chosen pairwise kind.
//!
//! Strongest paths are computed Floyd–Warshall style over the hopefuls,
//! `k → i → j`; a candidate's score is the number of hopefuls it beats on
//! strongest paths, so Schulze winners are exactly the top block.

use ev_core::BallotGroup;

use crate::cache::OutcomeCache;
use crate::method::{ElectionMethod, MethodOutcome};
use crate::methods::hopeful_ids;
use crate::ordering_tools::ordering_from_scores;
use crate::pairwise::{reference_matrix, PairwiseKind, PairwiseMatrix};
use crate::MethodError;

#[derive(Clone, Copy, Debug)]
pub struct Schulze {
    kind: PairwiseKind,
}

impl Schulze {
    pub fn new(kind: PairwiseKind) -> Self {
        Self { kind }
    }
}

impl Default for Schulze {
    fn default() -> Self {
        Self::new(PairwiseKind::WinningVotes)
    }
}

/// Strongest path strengths between hopefuls, row-major over all candidates.
///
/// `P[a][b] = d[a][b]` if `d[a][b] > d[b][a]`, else 0; then
/// `P[a][b] = max(P[a][b], min(P[a][k], P[k][b]))` for every intermediate.
pub fn strongest_paths<M: PairwiseMatrix>(matrix: &M, ids: &[usize]) -> Vec<f64> {
    let n = matrix.num_candidates();
    let mut p = vec![0.0; n * n];
    for &a in ids {
        for &b in ids {
            if a != b {
                let (ab, ba) = (matrix.get(a, b), matrix.get(b, a));
                if ab > ba {
                    p[a * n + b] = ab;
                }
            }
        }
    }
    for &k in ids {
        for &i in ids {
            if i == k {
                continue;
            }
            for &j in ids {
                if j == i || j == k {
                    continue;
                }
                let via = p[i * n + k].min(p[k * n + j]);
                if via > p[i * n + j] {
                    p[i * n + j] = via;
                }
            }
        }
    }
    p
}

impl ElectionMethod for Schulze {
    fn name(&self) -> String {
        format!("Schulze({})", self.kind.short_name())
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
        let reference = reference_matrix(election, num_candidates, cache, &mut scratch)?;
        let view = reference.view(self.kind);
        let ids = hopeful_ids(hopefuls);
        let p = strongest_paths(&view, &ids);

        let n = num_candidates;
        let mut wins = vec![0.0; n];
        for &a in &ids {
            wins[a] = ids
                .iter()
                .filter(|&&b| b != a && p[a * n + b] > p[b * n + a])
                .count() as f64;
        }

        Ok(MethodOutcome {
            ordering: ordering_from_scores(&wins, Some(hopefuls))?,
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

    /// Classic example: 5 A>C>B>E>D, 5 A>D>E>C>B, 8 B>E>D>A>C, 3 C>A>B>E>D,
    /// 7 C>A>E>B>D, 2 C>B>A>D>E, 7 D>C>E>B>A, 8 E>B>A>D>C. Winner: E.
    fn wikipedia_election() -> Vec<BallotGroup> {
        let (a, b, c, d, e) = (0, 1, 2, 3, 4);
        vec![
            ballot(5.0, &[a, c, b, e, d]),
            ballot(5.0, &[a, d, e, c, b]),
            ballot(8.0, &[b, e, d, a, c]),
            ballot(3.0, &[c, a, b, e, d]),
            ballot(7.0, &[c, a, e, b, d]),
            ballot(2.0, &[c, b, a, d, e]),
            ballot(7.0, &[d, c, e, b, a]),
            ballot(8.0, &[e, b, a, d, c]),
        ]
    }

    #[test]
    fn elects_the_beatpath_winner() {
        let out = Schulze::default()
            .elect(&wikipedia_election(), 5, None, false)
            .unwrap();
        assert_eq!(get_winners(&out), vec![4]);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn view_kinds_share_one_reference_matrix() {
        let election = wikipedia_election();
        let mut cache = OutcomeCache::new();
        let wv = Schulze::new(PairwiseKind::WinningVotes)
            .elect(&election, 5, Some(&mut cache), false)
            .unwrap();
        let margins = Schulze::new(PairwiseKind::Margins)
            .elect(&election, 5, Some(&mut cache), false)
            .unwrap();
        assert_eq!(get_winners(&wv), get_winners(&margins));
        assert!(cache.has_outcome("Schulze(wv)"));
        assert!(cache.has_outcome("Schulze(margins)"));
    }

    #[test]
    fn subset_election_only_ranks_hopefuls() {
        let out = Schulze::default()
            .elect_hopefuls(&wikipedia_election(), &[true, true, false, true, false], 5, None, false)
            .unwrap();
        assert_eq!(out.len(), 3);
        assert!(!out.contains(2));
        assert!(!out.contains(4));
    }
}
