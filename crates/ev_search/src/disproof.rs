//! Disproofs: the evidence that a strategy changed the winner.

use std::collections::BTreeMap;

use ev_algo::ballot_tools::election_to_text;
use ev_algo::ordering_tools::{candidate_label, ordering_to_text};
use ev_core::{Election, Ordering};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::SearchError;

/// Key of the targeted candidate in `Disproof::data`.
pub const CHOSEN_CHALLENGER: &str = "chosen_challenger";

/// Before/after elections and outcomes plus strategy-specific data.
///
/// Created by the runner with the honest side filled in; the strategy adds
/// `after_election` and its data, the runner adds `after_outcome`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Disproof {
    pub disprover_name: String,
    pub before_election: Election,
    pub after_election: Election,
    pub before_outcome: Ordering,
    pub after_outcome: Ordering,
    pub data: BTreeMap<String, usize>,
}

impl Disproof {
    pub fn new(disprover_name: impl Into<String>, before_election: Election, before_outcome: Ordering) -> Self {
        Self {
            disprover_name: disprover_name.into(),
            before_election,
            before_outcome,
            ..Self::default()
        }
    }

    pub fn chosen_challenger(&self) -> Result<usize, SearchError> {
        self.data
            .get(CHOSEN_CHALLENGER)
            .copied()
            .ok_or(SearchError::MissingAuxiliary(CHOSEN_CHALLENGER))
    }

    pub fn set_chosen_challenger(&mut self, challenger: usize) {
        self.data.insert(CHOSEN_CHALLENGER.to_owned(), challenger);
    }

    /// Human-readable report, one line per entry.
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![format!("{} disproof", self.disprover_name)];
        match self.chosen_challenger() {
            Ok(c) => lines.push(format!("chosen challenger: {}", candidate_label(c))),
            Err(_) => lines.push("chosen challenger: (unset)".to_owned()),
        }
        for (key, value) in self.data.iter().filter(|(k, _)| k.as_str() != CHOSEN_CHALLENGER) {
            lines.push(format!("{key}: {value}"));
        }
        lines.push("before:".to_owned());
        lines.extend(election_to_text(&self.before_election, false).into_iter().map(|l| format!("  {l}")));
        lines.push(format!("  outcome: {}", ordering_to_text(&self.before_outcome, false)));
        lines.push("after:".to_owned());
        lines.extend(election_to_text(&self.after_election, false).into_iter().map(|l| format!("  {l}")));
        lines.push(format!("  outcome: {}", ordering_to_text(&self.after_outcome, false)));
        lines
    }
}
