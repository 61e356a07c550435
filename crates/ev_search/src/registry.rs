//! The strategy registry.

use crate::strategies::{Burial, Coalitional, Compromising, PerBallot, TwoSided, TwoSidedReverse};
use crate::strategy::Strategy;
use crate::SearchError;

/// Every strategy this crate knows, in the order the runner tries them.
pub fn strategy_tests() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(PerBallot(Burial)),
        Box::new(PerBallot(Compromising)),
        Box::new(PerBallot(TwoSided)),
        Box::new(TwoSidedReverse),
        Box::new(Coalitional),
    ]
}

pub fn tests_by_category(category: &str) -> Vec<Box<dyn Strategy>> {
    strategy_tests()
        .into_iter()
        .filter(|t| t.category() == category)
        .collect()
}

/// Look a strategy up by its name or its criterion name, ignoring case.
pub fn test_by_name(name: &str) -> Result<Box<dyn Strategy>, SearchError> {
    let wanted = name.trim();
    strategy_tests()
        .into_iter()
        .find(|t| t.name().eq_ignore_ascii_case(wanted) || t.criterion_name().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| SearchError::UnknownTest(name.to_owned()))
}
