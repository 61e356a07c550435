//! Per-election memoization of method outcomes.
//!
//! The cache is keyed only by method name and holds no fingerprint of the
//! election it was filled from: whoever owns it must `clear()` it before
//! evaluating a different election. Besides outcomes it keeps one reference
//! pairwise-opposition matrix that every pairwise method reads through a
//! `PairwiseView`.

use std::collections::HashMap;

use ev_core::Ordering;

use crate::pairwise::{CondorcetMatrix, PairwiseKind, PairwiseView};
use crate::MethodError;

#[derive(Clone, Debug, Default)]
struct CachedOutcomes {
    full: Ordering,
    winner_only: Ordering,
}

#[derive(Clone, Debug, Default)]
pub struct OutcomeCache {
    outcomes: HashMap<String, CachedOutcomes>,
    condorcet: Option<CondorcetMatrix>,
}

impl OutcomeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best stored outcome for `name`, with its winner-only flag.
    ///
    /// A full ordering is always returned when present. A winner-only
    /// ordering is returned only if the caller accepts one. Otherwise the
    /// result is `(empty, false)`.
    pub fn get_outcome(&self, name: &str, winner_only: bool) -> (Ordering, bool) {
        match self.outcomes.get(name) {
            Some(entry) if !entry.full.is_empty() => (entry.full.clone(), false),
            Some(entry) if winner_only && !entry.winner_only.is_empty() => (entry.winner_only.clone(), true),
            _ => (Ordering::new(), false),
        }
    }

    /// Store into the full or the winner-only slot. The other slot is left
    /// alone, so a winner-only write never hides a full ordering.
    pub fn set_outcome(&mut self, name: &str, winner_only: bool, outcome: Ordering) {
        let entry = self.outcomes.entry(name.to_owned()).or_default();
        if winner_only {
            entry.winner_only = outcome;
        } else {
            entry.full = outcome;
        }
    }

    pub fn has_outcome(&self, name: &str) -> bool {
        self.outcomes
            .get(name)
            .is_some_and(|e| !e.full.is_empty() || !e.winner_only.is_empty())
    }

    /// Whether `get_outcome(name, winner_only)` would hit.
    pub fn has_outcome_for(&self, name: &str, winner_only: bool) -> bool {
        !self.get_outcome(name, winner_only).0.is_empty()
    }

    pub fn has_condorcet_matrix(&self) -> bool {
        self.condorcet.is_some()
    }

    /// Store the reference matrix; it must be in raw pairwise-opposition form.
    pub fn set_condorcet_matrix(&mut self, matrix: CondorcetMatrix) -> Result<(), MethodError> {
        if matrix.kind() != PairwiseKind::Opposition {
            return Err(MethodError::NonCanonicalMatrix(matrix.kind().short_name()));
        }
        self.condorcet = Some(matrix);
        Ok(())
    }

    pub fn condorcet_matrix(&self) -> Option<&CondorcetMatrix> {
        self.condorcet.as_ref()
    }

    pub fn condorcet_view(&self, kind: PairwiseKind) -> Option<PairwiseView<'_>> {
        self.condorcet.as_ref().map(|m| m.view(kind))
    }

    /// Forget everything; required before reuse on another election.
    pub fn clear(&mut self) {
        self.outcomes.clear();
        self.condorcet = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairwise::PairwiseMatrix;
    use ev_core::CandidateScore;

    fn abc() -> Ordering {
        [(0, 3), (1, 2), (2, 1)]
            .into_iter()
            .map(|(c, s)| CandidateScore::from_int(c, s))
            .collect()
    }

    #[test]
    fn empty_cache_misses() {
        let cache = OutcomeCache::new();
        let (o, wo) = cache.get_outcome("Plurality", true);
        assert!(o.is_empty());
        assert!(!wo);
        assert!(!cache.has_outcome("Plurality"));
    }

    #[test]
    fn full_outcome_answers_both_requests() {
        let mut cache = OutcomeCache::new();
        cache.set_outcome("Borda", false, abc());
        assert_eq!(cache.get_outcome("Borda", true), (abc(), false));
        assert_eq!(cache.get_outcome("Borda", false), (abc(), false));
    }

    #[test]
    fn winner_only_outcome_answers_winner_only_requests() {
        let mut cache = OutcomeCache::new();
        let top: Ordering = [CandidateScore::from_int(0, 1)].into_iter().collect();
        cache.set_outcome("Borda", true, top.clone());
        assert_eq!(cache.get_outcome("Borda", true), (top, true));
        assert!(cache.get_outcome("Borda", false).0.is_empty());
        assert!(cache.has_outcome("Borda"));
        assert!(!cache.has_outcome_for("Borda", false));
    }

    #[test]
    fn winner_only_write_keeps_full() {
        let mut cache = OutcomeCache::new();
        cache.set_outcome("Borda", false, abc());
        cache.set_outcome("Borda", true, [CandidateScore::from_int(1, 1)].into_iter().collect());
        assert_eq!(cache.get_outcome("Borda", true), (abc(), false));
    }

    #[test]
    fn condorcet_slot_requires_opposition_form() {
        let mut cache = OutcomeCache::new();
        let wv = CondorcetMatrix::from_raw(PairwiseKind::WinningVotes, 2, 1.0, vec![0.0, 1.0, 0.0, 0.0]).unwrap();
        assert_eq!(cache.set_condorcet_matrix(wv), Err(MethodError::NonCanonicalMatrix("wv")));
        assert!(!cache.has_condorcet_matrix());

        let po = CondorcetMatrix::from_raw(PairwiseKind::Opposition, 2, 3.0, vec![0.0, 2.0, 1.0, 0.0]).unwrap();
        cache.set_condorcet_matrix(po).unwrap();
        let view = cache.condorcet_view(PairwiseKind::Margins).unwrap();
        assert_eq!(view.get(0, 1), 1.0);
        assert_eq!(view.get(1, 0), 0.0);

        cache.clear();
        assert!(cache.condorcet_view(PairwiseKind::Margins).is_none());
    }
}
