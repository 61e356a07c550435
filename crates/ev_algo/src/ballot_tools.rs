//! Algorithms over whole elections: sorting, compression, truncation,
//! rescaling, and text rendering.

use std::cmp::Ordering as CmpOrdering;

use ev_core::{BallotGroup, CoreError, Election, Ordering};

use crate::ordering_tools::ordering_to_text;

/// Total order on ballot contents.
///
/// Walks both orderings in step: the first differing candidate decides
/// immediately; otherwise the first differing score is remembered. When one
/// is a prefix of the other the shorter sorts first, and only then does the
/// remembered score difference apply. `Equal` iff the orderings are equal.
pub fn cmp_contents(a: &Ordering, b: &Ordering) -> CmpOrdering {
    let mut by_score = CmpOrdering::Equal;
    for (x, y) in a.iter().zip(b.iter()) {
        match x.candidate().cmp(&y.candidate()) {
            CmpOrdering::Equal => {}
            other => return other,
        }
        if by_score == CmpOrdering::Equal {
            by_score = x.score().partial_cmp(&y.score()).unwrap_or(CmpOrdering::Equal);
        }
    }
    a.len().cmp(&b.len()).then(by_score)
}

/// Contents first, then weight.
pub fn cmp_ballots(a: &BallotGroup, b: &BallotGroup) -> CmpOrdering {
    cmp_contents(&a.contents, &b.contents)
        .then_with(|| a.weight().partial_cmp(&b.weight()).unwrap_or(CmpOrdering::Equal))
}

/// Stable sort by (contents, weight).
pub fn sort_ballots(election: &mut Election) {
    election.sort_by(cmp_ballots);
}

/// Merge groups with identical contents, summing weights.
///
/// The result is sorted. Flags of merged groups are OR-ed so a merged group
/// is complete/rated if any contributor was.
pub fn compress(mut election: Election) -> Result<Election, CoreError> {
    sort_ballots(&mut election);

    let mut out: Election = Vec::with_capacity(election.len());
    for ballot in election {
        match out.last_mut() {
            Some(prev) if prev.contents == ballot.contents => {
                let merged = prev.weight() + ballot.weight();
                prev.set_weight(merged)?;
                prev.complete |= ballot.complete;
                prev.rated |= ballot.rated;
            }
            _ => out.push(ballot),
        }
    }
    // Summed weights may have moved groups out of weight order.
    sort_ballots(&mut out);
    Ok(out)
}

/// Number of voters: the sum of all weights.
pub fn total_weight(election: &[BallotGroup]) -> f64 {
    election.iter().map(BallotGroup::weight).sum()
}

/// Keep the top `keep` rank levels of every ballot (at least one).
/// Ballots that lose candidates are marked incomplete.
pub fn truncate_after(election: &[BallotGroup], keep: usize) -> Election {
    let keep = keep.max(1);
    election
        .iter()
        .map(|ballot| {
            let mut contents = Ordering::new();
            let mut level = 0usize;
            let mut prev: Option<f64> = None;
            for cs in &ballot.contents {
                if prev.is_some_and(|p| p != cs.score()) {
                    level += 1;
                }
                if level >= keep {
                    break;
                }
                prev = Some(cs.score());
                contents.insert(*cs);
            }
            let truncated = contents.len() < ballot.contents.len();
            let mut out = ballot.clone();
            out.contents = contents;
            out.complete = ballot.complete && !truncated;
            out
        })
        .collect()
}

/// Multiply every weight by `factor` (must be positive).
pub fn rescale(election: &[BallotGroup], factor: f64) -> Result<Election, CoreError> {
    election
        .iter()
        .map(|ballot| {
            let mut out = ballot.clone();
            out.set_weight(ballot.weight() * factor)?;
            Ok(out)
        })
        .collect()
}

/// `"<weight>: <ordering>"`.
pub fn ballot_to_text(ballot: &BallotGroup, numeric: bool) -> String {
    format!("{}: {}", ballot.weight(), ordering_to_text(&ballot.contents, numeric))
}

pub fn election_to_text(election: &[BallotGroup], numeric: bool) -> Vec<String> {
    election.iter().map(|b| ballot_to_text(b, numeric)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ev_core::CandidateScore;
    use proptest::prelude::*;

    fn ballot(weight: f64, ranking: &[usize]) -> BallotGroup {
        let n = ranking.len() as i64;
        let contents = ranking
            .iter()
            .enumerate()
            .map(|(pos, &c)| CandidateScore::from_int(c, n - pos as i64))
            .collect();
        BallotGroup::new(weight, contents, true, false).unwrap()
    }

    #[test]
    fn compress_merges_identical_contents() {
        let election = vec![
            ballot(2.0, &[0, 1, 2]),
            ballot(1.0, &[1, 0, 2]),
            ballot(3.0, &[0, 1, 2]),
        ];
        let out = compress(election).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(total_weight(&out), 6.0);
        let abc = out.iter().find(|b| b.contents.first().unwrap().candidate() == 0).unwrap();
        assert_eq!(abc.weight(), 5.0);
    }

    #[test]
    fn compress_distinguishes_rank_structure() {
        let strict = ballot(1.0, &[0, 1, 2]);
        let mut tied = strict.clone();
        tied.replace_score(1, 1.0).unwrap();
        let out = compress(vec![strict, tied]).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn sort_puts_prefixes_first() {
        let mut election = vec![ballot(1.0, &[0, 1, 2]), ballot(1.0, &[0, 1])];
        sort_ballots(&mut election);
        assert_eq!(election[0].contents.len(), 2);
    }

    #[test]
    fn truncate_keeps_top_levels() {
        let election = vec![ballot(1.0, &[2, 0, 1])];
        let out = truncate_after(&election, 2);
        assert_eq!(out[0].contents.candidates().collect::<Vec<_>>(), vec![2, 0]);
        assert!(!out[0].complete);

        let whole = truncate_after(&election, 5);
        assert!(whole[0].complete);
    }

    #[test]
    fn rescale_rejects_non_positive_factor() {
        let election = vec![ballot(2.0, &[0, 1])];
        assert_eq!(rescale(&election, 1.5).unwrap()[0].weight(), 3.0);
        assert_eq!(rescale(&election, 0.0), Err(CoreError::NonPositiveWeight));
    }

    #[test]
    fn text_rendering() {
        let b = ballot(5.0, &[0, 1, 2]);
        assert_eq!(ballot_to_text(&b, false), "5: A > B > C");
    }

    fn arb_election() -> impl Strategy<Value = Election> {
        let one = (1u32..5, Just((0usize..4).collect::<Vec<_>>()).prop_shuffle(), 1usize..5)
            .prop_map(|(w, perm, keep)| ballot(w as f64, &perm[..keep.min(perm.len())]));
        prop::collection::vec(one, 0..24)
    }

    proptest! {
        #[test]
        fn compress_preserves_weight(e in arb_election()) {
            let before = total_weight(&e);
            let after = total_weight(&compress(e).unwrap());
            prop_assert_eq!(before, after);
        }

        #[test]
        fn compress_is_idempotent(e in arb_election()) {
            let once = compress(e).unwrap();
            let twice = compress(once.clone()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn compressed_contents_are_distinct(e in arb_election()) {
            let out = compress(e).unwrap();
            for (i, a) in out.iter().enumerate() {
                for b in &out[i + 1..] {
                    prop_assert_ne!(&a.contents, &b.contents);
                }
            }
        }
    }
}
