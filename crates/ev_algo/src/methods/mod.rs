//! Reference election methods.
//!
//! These are the methods the search engine is exercised against. They all go
//! through the dispatch contract in `crate::method` and honour hopefuls, so
//! they also serve as building blocks for each other (IRV runs plurality on
//! shrinking candidate subsets, `CommaMethod` composes a set method with a
//! ranking method).

use std::sync::Arc;

use ev_core::{BallotGroup, CandidateScore};

use crate::pairwise::PairwiseKind;
use crate::{ElectionMethod, MethodError};

pub mod borda;
pub mod comma;
pub mod copeland;
pub mod irv;
pub mod plurality;
pub mod schulze;
pub mod smith;

pub use borda::Borda;
pub use comma::CommaMethod;
pub use copeland::Copeland;
pub use irv::Irv;
pub use plurality::Plurality;
pub use schulze::Schulze;
pub use smith::SmithSet;

/// Names accepted by `method_by_name` (pairwise kinds expand as
/// `Schulze(<kind>)`).
pub const BASE_METHOD_NAMES: [&str; 6] = ["Plurality", "Borda", "Copeland", "IRV", "Smith", "Schulze(wv)"];

/// Resolve a method by name.
///
/// Accepts the plain names in `BASE_METHOD_NAMES`, `Schulze(<kind>)` for any
/// pairwise kind short name, and `[<set>],[<base>]` for the comma
/// combinator (or the shorthand `<set>,<base>`).
pub fn method_by_name(name: &str) -> Result<Arc<dyn ElectionMethod>, MethodError> {
    let name = name.trim();
    match name {
        "Plurality" => return Ok(Arc::new(Plurality)),
        "Borda" => return Ok(Arc::new(Borda)),
        "Copeland" => return Ok(Arc::new(Copeland)),
        "IRV" => return Ok(Arc::new(Irv)),
        "Smith" => return Ok(Arc::new(SmithSet)),
        _ => {}
    }

    if let Some((set, base)) = split_comma(name) {
        let set = method_by_name(set)?;
        let base = method_by_name(base)?;
        return Ok(Arc::new(CommaMethod::new(set, base)));
    }

    if let Some(kind) = name
        .strip_prefix("Schulze(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return PairwiseKind::from_short_name(kind)
            .map(|k| Arc::new(Schulze::new(k)) as Arc<dyn ElectionMethod>)
            .ok_or_else(|| MethodError::UnknownMethod(name.to_owned()));
    }

    Err(MethodError::UnknownMethod(name.to_owned()))
}

/// Split `[a],[b]` or `a,b` at the top-level comma.
fn split_comma(name: &str) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    for (i, ch) in name.char_indices() {
        match ch {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            ',' if depth == 0 => return Some((unbracket(&name[..i]), unbracket(&name[i + 1..]))),
            _ => {}
        }
    }
    None
}

fn unbracket(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(s)
}

// ---------- shared helpers ----------

/// Fail if a ballot mentions a candidate outside `0..num_candidates`.
pub(crate) fn check_candidates(election: &[BallotGroup], num_candidates: usize) -> Result<(), MethodError> {
    for ballot in election {
        for cs in &ballot.contents {
            if cs.candidate() >= num_candidates {
                return Err(MethodError::CandidateOutOfRange {
                    candidate: cs.candidate(),
                    num_candidates,
                });
            }
        }
    }
    Ok(())
}

/// The ballot's hopeful entries grouped into tied blocks, best first.
pub(crate) fn hopeful_blocks<'b>(ballot: &'b BallotGroup, hopefuls: &[bool]) -> Vec<Vec<&'b CandidateScore>> {
    let mut blocks: Vec<Vec<&CandidateScore>> = Vec::new();
    let mut prev: Option<f64> = None;
    for cs in ballot
        .contents
        .iter()
        .filter(|cs| hopefuls.get(cs.candidate()).copied().unwrap_or(false))
    {
        if prev != Some(cs.score()) {
            blocks.push(Vec::new());
        }
        prev = Some(cs.score());
        if let Some(block) = blocks.last_mut() {
            block.push(cs);
        }
    }
    blocks
}

/// Hopeful candidate ids, ascending.
pub(crate) fn hopeful_ids(hopefuls: &[bool]) -> Vec<usize> {
    hopefuls
        .iter()
        .enumerate()
        .filter_map(|(c, &h)| h.then_some(c))
        .collect()
}
