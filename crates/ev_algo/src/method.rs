//! The election-method contract.
//!
//! Implementations provide `name` and `elect_inner`. Callers never invoke
//! `elect_inner` directly; they go through `ElectionMethodExt`, which is
//! implemented for every method and owns the call protocol:
//!
//! 1. zero candidates is an error;
//! 2. with at most two candidates, winner-only mode is forced on;
//! 3. a hopefuls call naming every candidate becomes a whole-election call;
//! 4. zero hopefuls is an error, one hopeful short-circuits;
//! 5. whole-election calls consult and fill the cache, subset calls never do;
//! 6. the returned ordering must contain exactly the hopeful candidates.

use ev_core::{BallotGroup, CandidateScore, Ordering};
use tracing::trace;

use crate::cache::OutcomeCache;
use crate::MethodError;

/// An ordering plus whether only its top block is meaningful.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodOutcome {
    pub ordering: Ordering,
    pub winner_only: bool,
}

impl MethodOutcome {
    pub fn full(ordering: Ordering) -> Self {
        Self {
            ordering,
            winner_only: false,
        }
    }
}

pub trait ElectionMethod: Send + Sync {
    /// Unique per parameterization; doubles as the cache key.
    fn name(&self) -> String;

    /// Core logic over the hopeful candidates. Must rank every hopeful
    /// candidate and nobody else. With `winner_only` set the method may
    /// return any order below the winners, flagged in the outcome.
    fn elect_inner(
        &self,
        election: &[BallotGroup],
        hopefuls: &[bool],
        num_candidates: usize,
        cache: Option<&mut OutcomeCache>,
        winner_only: bool,
    ) -> Result<MethodOutcome, MethodError>;

    /// Whole-election core logic. Methods with a faster path when every
    /// candidate is in play override this.
    fn elect_inner_all(
        &self,
        election: &[BallotGroup],
        num_candidates: usize,
        cache: Option<&mut OutcomeCache>,
        winner_only: bool,
    ) -> Result<MethodOutcome, MethodError> {
        let hopefuls = vec![true; num_candidates];
        self.elect_inner(election, &hopefuls, num_candidates, cache, winner_only)
    }
}

fn check_cardinality(name: impl FnOnce() -> String, outcome: &MethodOutcome, expected: usize) -> Result<(), MethodError> {
    if outcome.ordering.len() != expected {
        return Err(MethodError::CardinalityMismatch {
            method: name(),
            expected,
            got: outcome.ordering.len(),
        });
    }
    Ok(())
}

/// Dispatch wrapper; see the module docs for the protocol.
pub trait ElectionMethodExt: ElectionMethod {
    fn elect_detailed(
        &self,
        election: &[BallotGroup],
        num_candidates: usize,
        mut cache: Option<&mut OutcomeCache>,
        winner_only: bool,
    ) -> Result<MethodOutcome, MethodError> {
        if num_candidates == 0 {
            return Err(MethodError::NoCandidates);
        }
        let winner_only = winner_only || num_candidates <= 2;
        let name = self.name();

        if let Some(cache) = cache.as_deref() {
            let (ordering, cached_winner_only) = cache.get_outcome(&name, winner_only);
            if !ordering.is_empty() {
                trace!(method = %name, winner_only = cached_winner_only, "outcome cache hit");
                return Ok(MethodOutcome {
                    ordering,
                    winner_only: cached_winner_only,
                });
            }
        }

        let outcome = self.elect_inner_all(election, num_candidates, cache.as_deref_mut(), winner_only)?;
        check_cardinality(|| name.clone(), &outcome, num_candidates)?;

        if let Some(cache) = cache {
            cache.set_outcome(&name, outcome.winner_only, outcome.ordering.clone());
        }
        Ok(outcome)
    }

    fn elect_detailed_hopefuls(
        &self,
        election: &[BallotGroup],
        hopefuls: &[bool],
        num_candidates: usize,
        cache: Option<&mut OutcomeCache>,
        winner_only: bool,
    ) -> Result<MethodOutcome, MethodError> {
        if num_candidates == 0 {
            return Err(MethodError::NoCandidates);
        }
        if hopefuls.len() != num_candidates {
            return Err(MethodError::HopefulsSizeMismatch {
                expected: num_candidates,
                got: hopefuls.len(),
            });
        }

        let num_hopefuls = hopefuls.iter().filter(|&&h| h).count();
        if num_hopefuls == num_candidates {
            return self.elect_detailed(election, num_candidates, cache, winner_only);
        }
        match num_hopefuls {
            0 => return Err(MethodError::NoHopefuls),
            1 => {
                let only = hopefuls.iter().position(|&h| h).ok_or(MethodError::NoHopefuls)?;
                let ordering = [CandidateScore::from_int(only, 1)].into_iter().collect();
                return Ok(MethodOutcome::full(ordering));
            }
            _ => {}
        }

        let winner_only = winner_only || num_candidates <= 2;
        let outcome = self.elect_inner(election, hopefuls, num_candidates, cache, winner_only)?;
        check_cardinality(|| self.name(), &outcome, num_hopefuls)?;
        Ok(outcome)
    }

    fn elect(
        &self,
        election: &[BallotGroup],
        num_candidates: usize,
        cache: Option<&mut OutcomeCache>,
        winner_only: bool,
    ) -> Result<Ordering, MethodError> {
        Ok(self.elect_detailed(election, num_candidates, cache, winner_only)?.ordering)
    }

    fn elect_hopefuls(
        &self,
        election: &[BallotGroup],
        hopefuls: &[bool],
        num_candidates: usize,
        cache: Option<&mut OutcomeCache>,
        winner_only: bool,
    ) -> Result<Ordering, MethodError> {
        Ok(self
            .elect_detailed_hopefuls(election, hopefuls, num_candidates, cache, winner_only)?
            .ordering)
    }
}

impl<M: ElectionMethod + ?Sized> ElectionMethodExt for M {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    /// Ranks hopefuls by id and counts how often its body runs.
    #[derive(Default)]
    struct ById {
        calls: AtomicUsize,
        drop_one: bool,
    }

    impl ElectionMethod for ById {
        fn name(&self) -> String {
            "ById".into()
        }

        fn elect_inner(
            &self,
            _election: &[BallotGroup],
            hopefuls: &[bool],
            num_candidates: usize,
            _cache: Option<&mut OutcomeCache>,
            winner_only: bool,
        ) -> Result<MethodOutcome, MethodError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            let take = if self.drop_one { num_candidates - 1 } else { num_candidates };
            let ordering = (0..take)
                .filter(|&c| hopefuls[c])
                .map(|c| CandidateScore::from_int(c, -(c as i64)))
                .collect();
            Ok(MethodOutcome { ordering, winner_only })
        }
    }

    fn calls(m: &ById) -> usize {
        m.calls.load(AtomicOrdering::SeqCst)
    }

    #[test]
    fn zero_candidates_rejected() {
        let m = ById::default();
        assert_eq!(m.elect(&[], 0, None, false), Err(MethodError::NoCandidates));
        assert_eq!(m.elect_hopefuls(&[], &[], 0, None, false), Err(MethodError::NoCandidates));
    }

    #[test]
    fn two_candidates_force_winner_only() {
        let m = ById::default();
        let out = m.elect_detailed(&[], 2, None, false).unwrap();
        assert!(out.winner_only);
        assert_eq!(out.ordering.len(), 2);
    }

    #[test]
    fn cache_hit_skips_method_body() {
        let m = ById::default();
        let mut cache = OutcomeCache::new();
        let first = m.elect(&[], 4, Some(&mut cache), false).unwrap();
        let second = m.elect(&[], 4, Some(&mut cache), true).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls(&m), 1);
        assert!(cache.has_outcome_for("ById", false));
    }

    #[test]
    fn winner_only_entry_does_not_answer_full_request() {
        let m = ById::default();
        let mut cache = OutcomeCache::new();
        m.elect(&[], 4, Some(&mut cache), true).unwrap();
        m.elect(&[], 4, Some(&mut cache), false).unwrap();
        assert_eq!(calls(&m), 2);
    }

    #[test]
    fn hopefuls_validation_and_short_circuits() {
        let m = ById::default();
        assert_eq!(
            m.elect_hopefuls(&[], &[true, false], 3, None, false),
            Err(MethodError::HopefulsSizeMismatch { expected: 3, got: 2 })
        );
        assert_eq!(
            m.elect_hopefuls(&[], &[false, false, false], 3, None, false),
            Err(MethodError::NoHopefuls)
        );

        let single = m.elect_hopefuls(&[], &[false, true, false], 3, None, false).unwrap();
        assert_eq!(single.candidates().collect::<Vec<_>>(), vec![1]);
        assert_eq!(calls(&m), 0);
    }

    #[test]
    fn subset_calls_bypass_the_cache() {
        let m = ById::default();
        let mut cache = OutcomeCache::new();
        let out = m
            .elect_hopefuls(&[], &[true, false, true, true], 4, Some(&mut cache), false)
            .unwrap();
        assert_eq!(out.candidates().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert!(!cache.has_outcome("ById"));

        m.elect_hopefuls(&[], &[true; 4], 4, Some(&mut cache), false).unwrap();
        assert!(cache.has_outcome("ById"));
    }

    #[test]
    fn cardinality_mismatch_is_reported() {
        let m = ById {
            drop_one: true,
            ..ById::default()
        };
        let err = m.elect(&[], 3, None, false).unwrap_err();
        assert_eq!(
            err,
            MethodError::CardinalityMismatch {
                method: "ById".into(),
                expected: 3,
                got: 2
            }
        );
    }
}
