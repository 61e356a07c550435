//! Candidate/score pairs and the tie-aware `Ordering` container.
//!
//! An `Ordering` is kept sorted best-first: descending score, then ascending
//! candidate id among equal scores. Iteration order is therefore fully
//! deterministic, and equal scores mean a tied rank. A candidate appears at
//! most once; inserting a candidate that is already present is refused, and
//! changing a stored score goes through `remove` + `insert`.

use alloc::vec::Vec;
use core::cmp::Ordering as CmpOrdering;
use core::slice;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::errors::CoreError;

/// One candidate with its (finite) score.
///
/// Equality looks at the candidate only, so an ordering can be probed for
/// membership regardless of score. Ranking position is given by `rank_cmp`.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CandidateScore {
    candidate: usize,
    score: f64,
}

impl CandidateScore {
    /// Build a pair, rejecting NaN and infinities.
    pub fn new(candidate: usize, score: f64) -> Result<Self, CoreError> {
        if !score.is_finite() {
            return Err(CoreError::NonFiniteScore);
        }
        Ok(Self { candidate, score })
    }

    /// Integer scores (rank indices, counts) are always finite.
    #[inline]
    pub fn from_int(candidate: usize, score: i64) -> Self {
        Self {
            candidate,
            score: score as f64,
        }
    }

    /// Same candidate, score sign flipped.
    #[inline]
    pub fn negated(&self) -> Self {
        Self {
            candidate: self.candidate,
            score: -self.score,
        }
    }

    #[inline]
    pub fn candidate(&self) -> usize {
        self.candidate
    }

    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Position comparison inside an `Ordering`: `Less` means `self` is
    /// listed first (higher score, or equal score and lower id).
    #[inline]
    pub fn rank_cmp(&self, other: &Self) -> CmpOrdering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(CmpOrdering::Equal)
            .then(self.candidate.cmp(&other.candidate))
    }
}

impl PartialEq for CandidateScore {
    fn eq(&self, other: &Self) -> bool {
        self.candidate == other.candidate
    }
}

impl Eq for CandidateScore {}

/// Ranking with ties, best first.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ordering {
    entries: Vec<CandidateScore>,
}

impl Ordering {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, CandidateScore> {
        self.entries.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[CandidateScore] {
        &self.entries
    }

    /// Best-ranked entry (lowest id among a tied top).
    #[inline]
    pub fn first(&self) -> Option<&CandidateScore> {
        self.entries.first()
    }

    /// Worst-ranked entry.
    #[inline]
    pub fn last(&self) -> Option<&CandidateScore> {
        self.entries.last()
    }

    pub fn max_score(&self) -> Option<f64> {
        self.first().map(CandidateScore::score)
    }

    pub fn min_score(&self) -> Option<f64> {
        self.last().map(CandidateScore::score)
    }

    /// Candidate ids in ranking order.
    pub fn candidates(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(CandidateScore::candidate)
    }

    pub fn contains(&self, candidate: usize) -> bool {
        self.position_of(candidate).is_some()
    }

    pub fn score_of(&self, candidate: usize) -> Option<f64> {
        self.position_of(candidate).map(|i| self.entries[i].score)
    }

    fn position_of(&self, candidate: usize) -> Option<usize> {
        self.entries.iter().position(|cs| cs.candidate == candidate)
    }

    /// Insert keeping the sort order. Returns `false` (and leaves the
    /// ordering untouched) if the candidate is already present.
    pub fn insert(&mut self, entry: CandidateScore) -> bool {
        if self.contains(entry.candidate) {
            return false;
        }
        let at = self
            .entries
            .partition_point(|cs| cs.rank_cmp(&entry) == CmpOrdering::Less);
        self.entries.insert(at, entry);
        true
    }

    /// Validating insert: the score must be finite and the candidate new.
    pub fn insert_score(&mut self, candidate: usize, score: f64) -> Result<(), CoreError> {
        if self.insert(CandidateScore::new(candidate, score)?) {
            Ok(())
        } else {
            Err(CoreError::DuplicateCandidate(candidate))
        }
    }

    pub fn remove(&mut self, candidate: usize) -> Option<CandidateScore> {
        self.position_of(candidate).map(|i| self.entries.remove(i))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Exact equality: same candidates at the same positions with identical
/// scores. (Entry equality alone would only compare candidates.)
impl PartialEq for Ordering {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a.candidate == b.candidate && a.score == b.score)
    }
}

impl FromIterator<CandidateScore> for Ordering {
    /// Later duplicates of a candidate are ignored.
    fn from_iter<I: IntoIterator<Item = CandidateScore>>(iter: I) -> Self {
        let mut out = Ordering::new();
        for cs in iter {
            out.insert(cs);
        }
        out
    }
}

impl<'a> IntoIterator for &'a Ordering {
    type Item = &'a CandidateScore;
    type IntoIter = slice::Iter<'a, CandidateScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
