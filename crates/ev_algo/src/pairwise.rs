//! Pairwise (Condorcet) matrices.
//!
//! `CondorcetMatrix` always stores raw pairwise opposition: entry `[a][b]`
//! is the weight of voters ranking `a` strictly above `b`. Every other
//! pairwise "kind" (winning votes, margins, ...) is a transform of the pair
//! `(matrix[a][b], matrix[b][a])`, applied on read by `PairwiseView`, which
//! borrows the reference matrix instead of copying it.

use ev_core::BallotGroup;

use crate::cache::OutcomeCache;
use crate::MethodError;

/// How a pairwise contest `(favor, oppose)` is turned into a strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PairwiseKind {
    WinningVotes,
    LosingVotes,
    Margins,
    LosingMargins,
    Opposition,
    WinningTies,
    TournamentWv,
    TournamentSymmetric,
    Fractional,
    RelativeMargins,
    Keener,
}

impl PairwiseKind {
    pub const ALL: [PairwiseKind; 11] = [
        PairwiseKind::WinningVotes,
        PairwiseKind::LosingVotes,
        PairwiseKind::Margins,
        PairwiseKind::LosingMargins,
        PairwiseKind::Opposition,
        PairwiseKind::WinningTies,
        PairwiseKind::TournamentWv,
        PairwiseKind::TournamentSymmetric,
        PairwiseKind::Fractional,
        PairwiseKind::RelativeMargins,
        PairwiseKind::Keener,
    ];

    /// Short name used inside method names, e.g. `Schulze(wv)`.
    pub fn short_name(self) -> &'static str {
        match self {
            PairwiseKind::WinningVotes => "wv",
            PairwiseKind::LosingVotes => "lv",
            PairwiseKind::Margins => "margins",
            PairwiseKind::LosingMargins => "l-margins",
            PairwiseKind::Opposition => "PO",
            PairwiseKind::WinningTies => "w/tv",
            PairwiseKind::TournamentWv => "tourn-wv",
            PairwiseKind::TournamentSymmetric => "tourn-sym",
            PairwiseKind::Fractional => "fwv",
            PairwiseKind::RelativeMargins => "rel-margins",
            PairwiseKind::Keener => "keener",
        }
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.short_name() == name)
    }

    pub fn transform(self, favor: f64, oppose: f64, num_voters: f64) -> f64 {
        match self {
            PairwiseKind::WinningVotes => {
                if favor > oppose {
                    favor
                } else {
                    0.0
                }
            }
            PairwiseKind::LosingVotes => {
                if num_voters - oppose > num_voters - favor {
                    num_voters - oppose
                } else {
                    0.0
                }
            }
            PairwiseKind::Margins => (favor - oppose).max(0.0),
            PairwiseKind::LosingMargins => favor - oppose,
            PairwiseKind::Opposition => favor,
            PairwiseKind::WinningTies => {
                if favor >= oppose {
                    favor
                } else {
                    0.0
                }
            }
            PairwiseKind::TournamentWv => {
                if favor > oppose {
                    1.0
                } else {
                    0.0
                }
            }
            PairwiseKind::TournamentSymmetric => {
                if favor > oppose {
                    1.0
                } else if favor == oppose {
                    0.0
                } else {
                    -1.0
                }
            }
            PairwiseKind::Fractional => {
                if favor > oppose {
                    favor / (favor + oppose)
                } else {
                    0.0
                }
            }
            PairwiseKind::RelativeMargins => {
                let total = favor + oppose;
                if total > 0.0 {
                    ((favor - oppose) / total).max(0.0)
                } else {
                    0.0
                }
            }
            PairwiseKind::Keener => {
                let inner = (favor + 1.0) / (favor + oppose + 2.0);
                0.5 + 0.5f64.copysign(inner - 0.5) * (2.0 * inner - 1.0).abs().sqrt()
            }
        }
    }
}

/// Read access shared by the reference matrix and its views.
pub trait PairwiseMatrix {
    fn num_candidates(&self) -> usize;
    fn num_voters(&self) -> f64;
    /// Strength of `a` over `b`. Out-of-range indices read as 0.
    fn get(&self, a: usize, b: usize) -> f64;

    /// `a` beats `b` in the raw head-to-head sense of this matrix.
    fn beats(&self, a: usize, b: usize) -> bool {
        self.get(a, b) > self.get(b, a)
    }
}

/// Raw pairwise opposition counts for one election.
#[derive(Clone, Debug, PartialEq)]
pub struct CondorcetMatrix {
    kind: PairwiseKind,
    num_candidates: usize,
    num_voters: f64,
    contents: Vec<f64>,
}

impl CondorcetMatrix {
    /// Count every ballot: for each pair with `a` ranked strictly above `b`,
    /// add the ballot weight to `[a][b]`. Candidates a ballot leaves out
    /// rank below all those it mentions and tie among themselves.
    pub fn count_ballots(election: &[BallotGroup], num_candidates: usize) -> Result<Self, MethodError> {
        if num_candidates == 0 {
            return Err(MethodError::NoCandidates);
        }
        let mut contents = vec![0.0; num_candidates * num_candidates];
        let mut num_voters = 0.0;
        let mut seen = vec![false; num_candidates];

        for ballot in election {
            let weight = ballot.weight();
            num_voters += weight;
            seen.iter_mut().for_each(|s| *s = false);

            let entries = ballot.contents.as_slice();
            for (i, cand) in entries.iter().enumerate() {
                let a = cand.candidate();
                if a >= num_candidates {
                    return Err(MethodError::CandidateOutOfRange {
                        candidate: a,
                        num_candidates,
                    });
                }
                seen[a] = true;
                for against in &entries[i + 1..] {
                    if against.score() == cand.score() {
                        continue;
                    }
                    let b = against.candidate();
                    if b >= num_candidates {
                        return Err(MethodError::CandidateOutOfRange {
                            candidate: b,
                            num_candidates,
                        });
                    }
                    contents[a * num_candidates + b] += weight;
                }
            }

            for a in entries.iter().map(|cs| cs.candidate()) {
                for (b, &ranked) in seen.iter().enumerate() {
                    if !ranked {
                        contents[a * num_candidates + b] += weight;
                    }
                }
            }
        }

        Ok(Self {
            kind: PairwiseKind::Opposition,
            num_candidates,
            num_voters,
            contents,
        })
    }

    /// A matrix from explicit raw values, stored under `kind`. Only
    /// `Opposition` matrices are accepted by the outcome cache.
    pub fn from_raw(kind: PairwiseKind, num_candidates: usize, num_voters: f64, contents: Vec<f64>) -> Result<Self, MethodError> {
        if num_candidates == 0 {
            return Err(MethodError::NoCandidates);
        }
        if contents.len() != num_candidates * num_candidates {
            return Err(MethodError::Invariant("pairwise contents must be num_candidates squared"));
        }
        Ok(Self {
            kind,
            num_candidates,
            num_voters,
            contents,
        })
    }

    pub fn kind(&self) -> PairwiseKind {
        self.kind
    }

    /// Untransformed entry.
    pub fn raw(&self, a: usize, b: usize) -> f64 {
        if a >= self.num_candidates || b >= self.num_candidates {
            return 0.0;
        }
        self.contents[a * self.num_candidates + b]
    }

    pub fn view(&self, kind: PairwiseKind) -> PairwiseView<'_> {
        PairwiseView { reference: self, kind }
    }
}

impl PairwiseMatrix for CondorcetMatrix {
    fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    fn num_voters(&self) -> f64 {
        self.num_voters
    }

    fn get(&self, a: usize, b: usize) -> f64 {
        self.kind.transform(self.raw(a, b), self.raw(b, a), self.num_voters)
    }
}

/// A reference matrix read through another pairwise kind.
#[derive(Clone, Copy, Debug)]
pub struct PairwiseView<'a> {
    reference: &'a CondorcetMatrix,
    kind: PairwiseKind,
}

impl<'a> PairwiseView<'a> {
    pub fn kind(&self) -> PairwiseKind {
        self.kind
    }

    pub fn reference(&self) -> &'a CondorcetMatrix {
        self.reference
    }
}

impl PairwiseMatrix for PairwiseView<'_> {
    fn num_candidates(&self) -> usize {
        self.reference.num_candidates
    }

    fn num_voters(&self) -> f64 {
        self.reference.num_voters
    }

    fn get(&self, a: usize, b: usize) -> f64 {
        self.kind.transform(
            self.reference.raw(a, b),
            self.reference.raw(b, a),
            self.reference.num_voters,
        )
    }
}

/// The election's opposition matrix: from the cache when present (counted
/// and stored on first use), otherwise counted into `scratch`.
pub fn reference_matrix<'a>(
    election: &[BallotGroup],
    num_candidates: usize,
    cache: Option<&'a mut OutcomeCache>,
    scratch: &'a mut Option<CondorcetMatrix>,
) -> Result<&'a CondorcetMatrix, MethodError> {
    match cache {
        Some(cache) => {
            if !cache.has_condorcet_matrix() {
                cache.set_condorcet_matrix(CondorcetMatrix::count_ballots(election, num_candidates)?)?;
            }
            let cache: &'a OutcomeCache = cache;
            cache
                .condorcet_matrix()
                .ok_or(MethodError::Invariant("condorcet matrix missing after store"))
        }
        None => Ok(scratch.insert(CondorcetMatrix::count_ballots(election, num_candidates)?)),
    }
}
