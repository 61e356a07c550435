//! Stateless algorithms over orderings.
//!
//! Scores are compared with `==`: two entries are tied iff their scores are
//! identical. All functions return fresh orderings and never mutate input.

use ev_core::{CandidateScore, CoreError, Ordering};

// ---------- winners / reversal ----------

/// Negate every score; ranks reverse and ties stay ties.
pub fn reverse(ordering: &Ordering) -> Ordering {
    ordering.iter().map(CandidateScore::negated).collect()
}

/// The top-scored block.
pub fn winner_only(ordering: &Ordering) -> Ordering {
    let Some(top) = ordering.max_score() else {
        return Ordering::new();
    };
    ordering
        .iter()
        .take_while(|cs| cs.score() == top)
        .copied()
        .collect()
}

/// Ids of all candidates sharing the top score, ascending.
pub fn get_winners(ordering: &Ordering) -> Vec<usize> {
    winner_only(ordering).candidates().collect()
}

pub fn has_multiple_winners(ordering: &Ordering) -> bool {
    let mut it = ordering.iter();
    match (it.next(), it.next()) {
        (Some(a), Some(b)) => a.score() == b.score(),
        _ => false,
    }
}

pub fn is_winner(ordering: &Ordering, candidate: usize) -> bool {
    match (ordering.max_score(), ordering.score_of(candidate)) {
        (Some(top), Some(s)) => s == top,
        _ => false,
    }
}

// ---------- rank scrubbing ----------

/// Dense ranks: 0 for first place, -1 for the next distinct score, ...
pub fn scrub_scores(ordering: &Ordering) -> Ordering {
    let mut out = Ordering::new();
    let mut rank = 0i64;
    let mut prev: Option<f64> = None;
    for cs in ordering {
        if prev.is_some_and(|p| p != cs.score()) {
            rank -= 1;
        }
        prev = Some(cs.score());
        out.insert(CandidateScore::from_int(cs.candidate(), rank));
    }
    out
}

/// Competition ranks: a tie of size k advances the counter by k.
pub fn scrub_scores_by_cand(ordering: &Ordering) -> Ordering {
    let mut out = Ordering::new();
    let mut rank = 0i64;
    let mut prev: Option<f64> = None;
    for (pos, cs) in ordering.iter().enumerate() {
        if prev.is_some_and(|p| p != cs.score()) {
            rank = -(pos as i64);
        }
        prev = Some(cs.score());
        out.insert(CandidateScore::from_int(cs.candidate(), rank));
    }
    out
}

// ---------- tie-breaking ----------

/// Map `cur` from `[min_in, max_in]` linearly onto `[min_out, max_out]`.
/// A degenerate input range maps everything to `min_out`.
pub fn renorm(min_in: f64, max_in: f64, cur: f64, min_out: f64, max_out: f64) -> f64 {
    let norm = if max_in == min_in {
        0.0
    } else {
        (cur - min_in) / (max_in - min_in)
    };
    norm * (max_out - min_out) + min_out
}

/// Perturb `tied` by `tiebreaker` without reversing any strict preference
/// already present in `tied`.
///
/// The perturbation lies in `[0.01 * delta, delta]`, where `delta` is the
/// smallest nonzero gap in `tied` (1 if there is none) divided by the
/// candidate count. Candidates the tiebreaker does not rank get 0.
pub fn tiebreak(tied: &Ordering, tiebreaker: &Ordering, num_candidates: usize) -> Result<Ordering, CoreError> {
    if tied.len() <= 1 {
        return Ok(tied.clone());
    }

    let mut gap = f64::INFINITY;
    for pair in tied.as_slice().windows(2) {
        let d = pair[0].score() - pair[1].score();
        if d > 0.0 && d < gap {
            gap = d;
        }
    }
    if !gap.is_finite() {
        gap = 1.0;
    }
    // With one candidate the perturbation would reach the full gap.
    let delta = gap / num_candidates.max(2) as f64;

    let (lo, hi) = match (tiebreaker.min_score(), tiebreaker.max_score()) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => (0.0, 0.0),
    };

    let mut out = Ordering::new();
    for cs in tied {
        let bump = match tiebreaker.score_of(cs.candidate()) {
            Some(s) => renorm(lo, hi, s, 0.01 * delta, delta),
            None => 0.0,
        };
        out.insert(CandidateScore::new(cs.candidate(), cs.score() + bump)?);
    }
    Ok(out)
}

/// Dense ranks counted from the bottom: the worst block is 0.
fn ranks_from_bottom(ordering: &Ordering) -> Vec<(usize, i64)> {
    let mut out = Vec::with_capacity(ordering.len());
    let mut rank = 0i64;
    let mut prev: Option<f64> = None;
    for cs in ordering.as_slice().iter().rev() {
        if prev.is_some_and(|p| p != cs.score()) {
            rank += 1;
        }
        prev = Some(cs.score());
        out.push((cs.candidate(), rank));
    }
    out
}

const UNRANKED: i64 = -10;

/// Rank-based composition for "Set,Method" combinators.
///
/// Candidates are sorted by (rank in `tied`, rank in `tiebreaker`) and
/// re-ranked densely from that order. Only candidates of `tied` are emitted;
/// those missing from `tiebreaker` sort below every ranked one.
pub fn ranked_tiebreak(tied: &Ordering, tiebreaker: &Ordering, num_candidates: usize) -> Ordering {
    let size = tied
        .candidates()
        .chain(tiebreaker.candidates())
        .map(|c| c + 1)
        .max()
        .unwrap_or(0)
        .max(num_candidates);

    let mut ranks = vec![(UNRANKED, UNRANKED); size];
    for (c, r) in ranks_from_bottom(tied) {
        ranks[c].0 = r;
    }
    for (c, r) in ranks_from_bottom(tiebreaker) {
        ranks[c].1 = r;
    }

    let mut keyed: Vec<((i64, i64), usize)> = tied.candidates().map(|c| (ranks[c], c)).collect();
    keyed.sort();

    let mut out = Ordering::new();
    let mut rank = 0i64;
    let mut prev: Option<(i64, i64)> = None;
    for (key, c) in keyed {
        if prev.is_some_and(|p| p != key) {
            rank += 1;
        }
        prev = Some(key);
        out.insert(CandidateScore::from_int(c, rank));
    }
    out
}

// ---------- construction / rendering ----------

/// Per-candidate scores to an ordering, keeping only hopefuls when given.
pub fn ordering_from_scores(scores: &[f64], hopefuls: Option<&[bool]>) -> Result<Ordering, CoreError> {
    let mut out = Ordering::new();
    for (c, &s) in scores.iter().enumerate() {
        if hopefuls.map_or(true, |h| h.get(c).copied().unwrap_or(false)) {
            out.insert(CandidateScore::new(c, s)?);
        }
    }
    Ok(out)
}

/// `A`..`Z`, then `#<id>`.
pub fn candidate_label(candidate: usize) -> String {
    if candidate < 26 {
        char::from(b'A' + candidate as u8).to_string()
    } else {
        format!("#{candidate}")
    }
}

/// `"A > B = C"`; with `numeric`, `"A(3) > B(1) = C(1)"`.
pub fn ordering_to_text(ordering: &Ordering, numeric: bool) -> String {
    let mut out = String::new();
    let mut prev: Option<f64> = None;
    for cs in ordering {
        if let Some(p) = prev {
            out.push_str(if p == cs.score() { " = " } else { " > " });
        }
        prev = Some(cs.score());
        out.push_str(&candidate_label(cs.candidate()));
        if numeric {
            out.push_str(&format!("({})", cs.score()));
        }
    }
    out
}
