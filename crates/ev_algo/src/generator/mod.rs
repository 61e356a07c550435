//! Ballot generators.

use ev_core::{BallotGroup, CoreError, Election, SearchRng};

use crate::ballot_tools::compress;

pub mod impartial;

pub use impartial::ImpartialCulture;

pub trait BallotGenerator: Send + Sync {
    fn name(&self) -> String;

    /// One voter's ballot (weight 1).
    fn generate_ballot(&self, num_candidates: usize, rng: &mut SearchRng) -> Result<BallotGroup, CoreError>;

    /// Whether `generate_ballots` merges identical ballots.
    fn compresses(&self) -> bool {
        false
    }

    /// `num_voters` independent ballots, compressed if configured.
    fn generate_ballots(&self, num_voters: usize, num_candidates: usize, rng: &mut SearchRng) -> Result<Election, CoreError> {
        let election = (0..num_voters)
            .map(|_| self.generate_ballot(num_candidates, rng))
            .collect::<Result<Election, CoreError>>()?;
        if self.compresses() {
            compress(election)
        } else {
            Ok(election)
        }
    }
}
