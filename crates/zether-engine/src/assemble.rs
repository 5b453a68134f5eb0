//! Orchestration: validate the input, run both engines, merge and cross-check.

use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;
use zether_core::{Error, Real, Result, ZetaResult};

use crate::bernoulli::BernoulliCache;
use crate::reconstruct::AnalyticReconstructionEngine;
use crate::series::SeriesSummationEngine;

/// Smallest accepted input.
pub const MIN_N: i64 = 3;

/// Largest accepted input.
pub const MAX_N: i64 = 53;

/// Relative tolerance of the cross-check, as a power of ten.
const REL_TOL_EXP: u32 = 25;

/// Composes [`SeriesSummationEngine`] and [`AnalyticReconstructionEngine`]
/// for a validated input and merges their outputs into one [`ZetaResult`].
///
/// The two engines have no data dependency and run on `rayon::join`. The
/// series path is the ground truth: its failure is fatal, while an unstable
/// reconstruction degrades the result to series-only output.
pub struct ResultAssembler {
    series: SeriesSummationEngine,
    analytic: AnalyticReconstructionEngine,
    rel_tol: Real,
}

impl ResultAssembler {
    /// Assembler with default engines backed by the given Bernoulli cache.
    pub fn new(cache: Arc<BernoulliCache>) -> Self {
        Self::with_engines(
            SeriesSummationEngine::default(),
            AnalyticReconstructionEngine::new(cache),
        )
    }

    /// Assembler over explicitly configured engines.
    pub fn with_engines(
        series: SeriesSummationEngine,
        analytic: AnalyticReconstructionEngine,
    ) -> Self {
        let rel_tol = Real::from_ratio(&BigRational::new(
            BigInt::one(),
            BigInt::from(10u32).pow(REL_TOL_EXP),
        ));
        ResultAssembler { series, analytic, rel_tol }
    }

    /// Compute ζ(n) both ways for n ∈ [3, 53] ∩ odd.
    pub fn assemble(&self, n: i64) -> Result<ZetaResult> {
        let n = validate(n)?;

        let (series_out, analytic_out) =
            rayon::join(|| self.series.compute(n), || self.analytic.compute(n));
        let series = series_out?;

        match analytic_out {
            Ok(recon) => {
                let agree = self.methods_agree(n, &series.value, &recon.value);
                if !agree {
                    tracing::warn!(n, "series and reconstruction disagree beyond tolerance");
                }
                Ok(ZetaResult {
                    n,
                    series_value: series.value,
                    convergence_trace: series.trace,
                    symbolic_formula: Some(recon.formula),
                    reconstructed_value: Some(recon.value),
                    components: recon.components,
                    methods_agree: Some(agree),
                })
            }
            Err(Error::ReconstructionUnstable(msg)) => {
                tracing::warn!(n, %msg, "degrading to series-only output");
                Ok(ZetaResult {
                    n,
                    series_value: series.value,
                    convergence_trace: series.trace,
                    symbolic_formula: None,
                    reconstructed_value: None,
                    components: Vec::new(),
                    methods_agree: None,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Truncation-aware agreement check.
    ///
    /// The partial sum sits below the true value by at most the integral-test
    /// tail bound, so the reconstruction (which approximates the limit to the
    /// working precision) must land within `tail + rel_tol·|series|` of it.
    /// For large n the tail underflows and this reduces to a pure relative
    /// comparison.
    fn methods_agree(&self, n: u32, series: &Real, reconstructed: &Real) -> bool {
        let tail = self.series.truncation_bound(n);
        let allowed = &tail + &(series * &self.rel_tol);
        (reconstructed - series).abs() <= allowed
    }
}

fn validate(n: i64) -> Result<u32> {
    if !(MIN_N..=MAX_N).contains(&n) {
        return Err(Error::InvalidArgument(format!(
            "n must be between {MIN_N} and {MAX_N}, got {n}"
        )));
    }
    if n % 2 == 0 {
        return Err(Error::InvalidArgument(format!("n must be odd, got {n}")));
    }
    Ok(n as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> ResultAssembler {
        ResultAssembler::new(Arc::new(BernoulliCache::new()))
    }

    fn expect_invalid(n: i64, needle: &str) {
        match assembler().assemble(n) {
            Err(Error::InvalidArgument(msg)) => {
                assert!(msg.contains(needle), "message {msg:?} missing {needle:?}")
            }
            other => panic!("n={n}: expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_messages_name_the_constraint() {
        expect_invalid(1, "between");
        expect_invalid(54, "between");
        expect_invalid(55, "between");
        expect_invalid(0, "between");
        expect_invalid(-3, "between");
        expect_invalid(4, "odd");
        expect_invalid(2, "odd");
    }

    #[test]
    fn test_assemble_n5_end_to_end() {
        let result = assembler().assemble(5).unwrap();
        assert_eq!(result.n, 5);
        assert_eq!(result.convergence_trace.len(), 2000);
        assert_eq!(
            result.convergence_trace.last().unwrap().partial_sum,
            result.series_value
        );
        assert!(result.has_reconstruction());
        assert_eq!(result.methods_agree, Some(true));
        assert!(result.symbolic_formula.as_deref().unwrap().starts_with("\\zeta(5)"));
        // ζ(5) ≈ 1.0369277551...
        let approx = result.series_value.to_f64();
        assert!((approx - 1.036_927_755).abs() < 1e-6);
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let a = assembler();
        assert_eq!(a.assemble(7).unwrap(), a.assemble(7).unwrap());
        // And across assemblers with fresh caches.
        assert_eq!(a.assemble(7).unwrap(), assembler().assemble(7).unwrap());
    }

    #[test]
    fn test_unstable_reconstruction_degrades_to_series_only() {
        let cache = Arc::new(BernoulliCache::new());
        let assembler = ResultAssembler::with_engines(
            SeriesSummationEngine::default(),
            AnalyticReconstructionEngine::with_correction_cap(cache, 2),
        );
        let result = assembler.assemble(9).unwrap();
        assert!(!result.has_reconstruction());
        assert!(result.symbolic_formula.is_none());
        assert!(result.components.is_empty());
        assert_eq!(result.methods_agree, None);
        // The series side is intact.
        assert_eq!(result.convergence_trace.len(), 2000);
    }
}
