//! Impartial culture: every voter draws a uniformly random ranking.

use ev_core::{BallotGroup, CandidateScore, CoreError, Ordering, SearchRng};

use super::BallotGenerator;

#[derive(Clone, Copy, Debug, Default)]
pub struct ImpartialCulture {
    pub compress: bool,
    /// Keep only a random prefix of length 1..n-1 of each ranking.
    pub truncate: bool,
}

impl ImpartialCulture {
    pub fn new(compress: bool, truncate: bool) -> Self {
        Self { compress, truncate }
    }
}

impl BallotGenerator for ImpartialCulture {
    fn name(&self) -> String {
        if self.truncate {
            "Impartial (truncated)".into()
        } else {
            "Impartial".into()
        }
    }

    fn compresses(&self) -> bool {
        self.compress
    }

    fn generate_ballot(&self, num_candidates: usize, rng: &mut SearchRng) -> Result<BallotGroup, CoreError> {
        let mut candidates: Vec<usize> = (0..num_candidates).collect();
        rng.shuffle_in_place(&mut candidates);

        let keep = if self.truncate && num_candidates > 1 {
            rng.next_int_between(1, num_candidates)?
        } else {
            num_candidates
        };

        let contents: Ordering = candidates[..keep]
            .iter()
            .enumerate()
            .map(|(pos, &c)| CandidateScore::from_int(c, (num_candidates - pos) as i64))
            .collect();
        BallotGroup::new(1.0, contents, keep == num_candidates, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot_tools::total_weight;

    #[test]
    fn complete_ballots_rank_everyone() {
        let gen = ImpartialCulture::default();
        let mut rng = SearchRng::from_seed_u64(1);
        let election = gen.generate_ballots(50, 5, &mut rng).unwrap();
        assert_eq!(election.len(), 50);
        for b in &election {
            assert_eq!(b.contents.len(), 5);
            assert!(b.complete);
            assert!(!b.rated);
        }
    }

    #[test]
    fn truncated_ballots_are_incomplete_prefixes() {
        let gen = ImpartialCulture::new(false, true);
        let mut rng = SearchRng::from_seed_u64(2);
        for _ in 0..50 {
            let b = gen.generate_ballot(4, &mut rng).unwrap();
            assert!((1..4).contains(&b.contents.len()));
            assert!(!b.complete);
        }
    }

    #[test]
    fn compression_keeps_voter_count() {
        let gen = ImpartialCulture::new(true, false);
        let mut rng = SearchRng::from_seed_u64(3);
        let election = gen.generate_ballots(200, 3, &mut rng).unwrap();
        assert!(election.len() <= 6);
        assert_eq!(total_weight(&election), 200.0);
    }

    #[test]
    fn same_seed_same_election() {
        let gen = ImpartialCulture::new(true, true);
        let a = gen.generate_ballots(40, 4, &mut SearchRng::from_seed_u64(9)).unwrap();
        let b = gen.generate_ballots(40, 4, &mut SearchRng::from_seed_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
