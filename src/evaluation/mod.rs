//! Solution evaluation: full traversal, consistency checks, and
//! incremental bit-flip deltas.

mod evaluator;
mod flip;

pub use evaluator::{check_consistency, evaluate, Inconsistency};
pub use flip::{rewrite_suffix, suffix_travel_time, FlipMove};
