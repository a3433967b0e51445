//! Common interface implemented by both metaheuristics (C5, C6), so the
//! block driver can be generic over the optimizer in use.

use crate::candidate::Candidate;
use crate::metric::Metric;
use rand::rngs::SmallRng;

/// A fixed concrete RNG type is used here (rather than `impl Rng`) so that
/// this trait stays object-safe and the block driver can pick TLBO vs. SCA
/// at runtime via `Box<dyn Optimizer>`.
pub trait Optimizer {
    /// Run the optimizer to completion against `metric`, returning the best
    /// fitness found and its corresponding candidate.
    fn optimize(&mut self, metric: &Metric, rng: &mut SmallRng) -> (f64, Candidate);
}
