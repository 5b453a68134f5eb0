//! Direct series summation of ζ(n) = Σ 1/k^n with a convergence trace.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;
use zether_core::{ConvergencePoint, Error, Real, Result};

/// Term count matching the observed front-end contract.
pub const DEFAULT_TERM_COUNT: u32 = 2000;

/// Outcome of a series summation: the final partial sum and every
/// intermediate point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesOutcome {
    /// `S_N` over the full term count.
    pub value: Real,

    /// `(k, S_k)` for `k = 1..=N`, emitted without downsampling.
    pub trace: Vec<ConvergencePoint>,
}

/// Partial-sum engine for ζ(n).
///
/// Terms are accumulated in ascending `k` at the working precision; the
/// order is fixed for reproducibility even though the series is absolutely
/// convergent. The engine defends its own precondition (odd n ≥ 3) even
/// though the assembler validates the full input domain first.
#[derive(Debug, Clone)]
pub struct SeriesSummationEngine {
    term_count: u32,
}

impl Default for SeriesSummationEngine {
    fn default() -> Self {
        SeriesSummationEngine { term_count: DEFAULT_TERM_COUNT }
    }
}

impl SeriesSummationEngine {
    /// Engine with an explicit term count.
    pub fn new(term_count: u32) -> Self {
        SeriesSummationEngine { term_count }
    }

    /// Configured term count.
    pub fn term_count(&self) -> u32 {
        self.term_count
    }

    /// Compute `S_N` and the full convergence trace for odd `n ≥ 3`.
    pub fn compute(&self, n: u32) -> Result<SeriesOutcome> {
        check_precondition(n)?;
        let mut sum = Real::zero();
        let mut trace = Vec::with_capacity(self.term_count as usize);
        for k in 1..=self.term_count {
            sum += &Real::recip_upow(u64::from(k), n);
            trace.push(ConvergencePoint { term: k, partial_sum: sum.clone() });
        }
        Ok(SeriesOutcome { value: sum, trace })
    }

    /// Upper bound on the truncation tail `Σ_{k>N} 1/k^n`, from the integral
    /// test: tail < N^(1−n)/(n−1). Underflows to exact zero for large n,
    /// where the partial sum is already exact at the working precision.
    pub fn truncation_bound(&self, n: u32) -> Real {
        let denom = BigInt::from(self.term_count).pow(n - 1) * (n - 1);
        Real::from_ratio(&BigRational::new(BigInt::one(), denom))
    }
}

fn check_precondition(n: u32) -> Result<()> {
    if n < 3 {
        return Err(Error::InvalidArgument(format!(
            "series requires n >= 3 for convergence margin, got {n}"
        )));
    }
    if n % 2 == 0 {
        return Err(Error::InvalidArgument(format!("series engine takes odd n, got {n}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZETA_3: &str = "1.2020569031595942853997381615114499907649862923405";

    #[test]
    fn test_rejects_precondition_violations() {
        let engine = SeriesSummationEngine::default();
        assert!(engine.compute(1).is_err());
        assert!(engine.compute(4).is_err());
        assert!(engine.compute(0).is_err());
    }

    #[test]
    fn test_trace_shape_and_final_value() {
        let engine = SeriesSummationEngine::default();
        let out = engine.compute(3).unwrap();
        assert_eq!(out.trace.len(), DEFAULT_TERM_COUNT as usize);
        assert_eq!(out.trace[0].term, 1);
        assert_eq!(out.trace[0].partial_sum, Real::one());
        // Final trace point carries the series value exactly.
        assert_eq!(out.trace.last().unwrap().partial_sum, out.value);
    }

    #[test]
    fn test_trace_is_monotone_non_decreasing() {
        let engine = SeriesSummationEngine::default();
        let out = engine.compute(5).unwrap();
        for pair in out.trace.windows(2) {
            assert!(pair[0].partial_sum <= pair[1].partial_sum);
            assert_eq!(pair[0].term + 1, pair[1].term);
        }
    }

    #[test]
    fn test_partial_sum_brackets_zeta3() {
        let engine = SeriesSummationEngine::default();
        let out = engine.compute(3).unwrap();
        let known = Real::parse(ZETA_3).unwrap();
        // The partial sum sits strictly below the limit, within the
        // integral-test tail bound.
        assert!(out.value < known);
        let gap = &known - &out.value;
        assert!(gap < engine.truncation_bound(3));
    }

    #[test]
    fn test_value_decreases_with_n() {
        let engine = SeriesSummationEngine::default();
        let v3 = engine.compute(3).unwrap().value;
        let v5 = engine.compute(5).unwrap().value;
        let v7 = engine.compute(7).unwrap().value;
        assert!(v3 > v5 && v5 > v7);
        assert!(v7 > Real::one());
    }

    #[test]
    fn test_small_term_count() {
        let engine = SeriesSummationEngine::new(1);
        let out = engine.compute(3).unwrap();
        assert_eq!(out.value, Real::one());
        assert_eq!(out.trace.len(), 1);
    }
}
