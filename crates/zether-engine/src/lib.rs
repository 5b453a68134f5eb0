//! # zether-engine
//!
//! Computation engines for odd Riemann zeta values ζ(n), 3 ≤ n ≤ 53, n odd.
//!
//! Two independent strategies are exposed for the same input:
//! - [`SeriesSummationEngine`] — direct partial summation of Σ 1/k^n with a
//!   per-term convergence trace;
//! - [`AnalyticReconstructionEngine`] — a closed-form reconstruction of
//!   ζ(2m+1) from ζ(2m), powers of π, Bernoulli numbers, and two
//!   geometrically-convergent correction series.
//!
//! [`ResultAssembler`] composes both, cross-checks their numeric agreement,
//! and degrades to series-only output when the analytic path cannot certify
//! its precision. The engines are pure values with no shared mutable state;
//! the only cross-cutting state is the injected [`BernoulliCache`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod bernoulli;
pub mod reconstruct;
pub mod series;

pub use assemble::{ResultAssembler, MAX_N, MIN_N};
pub use bernoulli::BernoulliCache;
pub use reconstruct::{AnalyticReconstructionEngine, Reconstruction};
pub use series::{SeriesOutcome, SeriesSummationEngine, DEFAULT_TERM_COUNT};
