//! Weighted ballot groups and elections.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::errors::CoreError;
use crate::ordering::{CandidateScore, Ordering};

/// `weight` identical voters casting `contents`.
///
/// `complete` is set when every candidate is ranked; `rated` when the
/// scores carry meaning beyond their rank order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BallotGroup {
    weight: f64,
    pub contents: Ordering,
    pub complete: bool,
    pub rated: bool,
}

/// Ballot groups in a stable order.
pub type Election = Vec<BallotGroup>;

#[inline]
fn check_weight(weight: f64) -> Result<f64, CoreError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(CoreError::NonPositiveWeight)
    }
}

impl BallotGroup {
    pub fn new(weight: f64, contents: Ordering, complete: bool, rated: bool) -> Result<Self, CoreError> {
        Ok(Self {
            weight: check_weight(weight)?,
            contents,
            complete,
            rated,
        })
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) -> Result<(), CoreError> {
        self.weight = check_weight(weight)?;
        Ok(())
    }

    /// Move `candidate` to `new_score`. Validates the score before touching
    /// the contents, so a failed call leaves the ballot unchanged.
    pub fn replace_score(&mut self, candidate: usize, new_score: f64) -> Result<(), CoreError> {
        let replacement = CandidateScore::new(candidate, new_score)?;
        self.contents
            .remove(candidate)
            .ok_or(CoreError::UnknownCandidate(candidate))?;
        self.contents.insert(replacement);
        Ok(())
    }

    pub fn max_score(&self) -> Option<f64> {
        self.contents.max_score()
    }

    pub fn min_score(&self) -> Option<f64> {
        self.contents.min_score()
    }
}
