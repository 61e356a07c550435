//! "Set,Method" combinator: restrict to a set method's top and let a second
//! method order within it.
//!
//! Both inner methods go through the full dispatch path with the same cache,
//! so a set computed for one combinator is reused by the next.

use std::sync::Arc;

use ev_core::BallotGroup;

use crate::cache::OutcomeCache;
use crate::method::{ElectionMethod, ElectionMethodExt, MethodOutcome};
use crate::ordering_tools::ranked_tiebreak;
use crate::MethodError;

#[derive(Clone)]
pub struct CommaMethod {
    set_method: Arc<dyn ElectionMethod>,
    specific_method: Arc<dyn ElectionMethod>,
}

impl CommaMethod {
    pub fn new(set_method: Arc<dyn ElectionMethod>, specific_method: Arc<dyn ElectionMethod>) -> Self {
        Self {
            set_method,
            specific_method,
        }
    }
}

impl ElectionMethod for CommaMethod {
    fn name(&self) -> String {
        format!("[{}],[{}]", self.set_method.name(), self.specific_method.name())
    }

    fn elect_inner(
        &self,
        election: &[BallotGroup],
        hopefuls: &[bool],
        num_candidates: usize,
        mut cache: Option<&mut OutcomeCache>,
        winner_only: bool,
    ) -> Result<MethodOutcome, MethodError> {
        let set = self.set_method.elect_detailed_hopefuls(
            election,
            hopefuls,
            num_candidates,
            cache.as_deref_mut(),
            false,
        )?;
        let specific = self.specific_method.elect_detailed_hopefuls(
            election,
            hopefuls,
            num_candidates,
            cache.as_deref_mut(),
            winner_only,
        )?;

        Ok(MethodOutcome {
            ordering: ranked_tiebreak(&set.ordering, &specific.ordering, num_candidates),
            winner_only: set.winner_only || specific.winner_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::testutil::{ballot, ids};
    use crate::methods::{Plurality, SmithSet};
    use crate::ordering_tools::get_winners;

    #[test]
    fn smith_plurality_picks_within_the_set() {
        // Plurality elects 3, a Condorcet loser; 0 is the Condorcet winner.
        let election = vec![
            ballot(4.0, &[3, 0, 1, 2]),
            ballot(3.0, &[0, 1, 2, 3]),
            ballot(3.0, &[1, 2, 0, 3]),
            ballot(3.0, &[2, 0, 1, 3]),
        ];
        let plain = Plurality.elect(&election, 4, None, false).unwrap();
        assert_eq!(get_winners(&plain), vec![3]);

        let method = CommaMethod::new(Arc::new(SmithSet), Arc::new(Plurality));
        let mut cache = OutcomeCache::new();
        let out = method.elect(&election, 4, Some(&mut cache), false).unwrap();
        assert_eq!(get_winners(&out), vec![0]);
        assert_eq!(*ids(&out).last().unwrap(), 3);
        assert!(cache.has_outcome("Smith"));
        assert!(cache.has_outcome("[Smith],[Plurality]"));
    }
}
