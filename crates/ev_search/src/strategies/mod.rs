//! Concrete strategies.

pub mod coalitional;
pub mod per_ballot;
pub mod two_sided_reverse;

pub use coalitional::Coalitional;
pub use per_ballot::{Burial, Compromising, PerBallot, TwoSided};
pub use two_sided_reverse::TwoSidedReverse;
