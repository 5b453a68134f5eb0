//! Common data types for Zether.

use serde::{Deserialize, Serialize};

use crate::precision::Real;

/// One point of the series convergence trace: the cumulative partial sum
/// after `term` terms. Traces are ordered by strictly increasing `term` and,
/// since every series term is non-negative, carry non-decreasing sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    /// 1-based term index `k`.
    pub term: u32,

    /// Partial sum `S_k = Σ_{i=1..k} 1/i^n`.
    pub partial_sum: Real,
}

/// One additive piece of the analytic closed form, carrying its own
/// LaTeX sub-expression and evaluated value. Ordered to match the formula's
/// left-to-right structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaComponent {
    /// Human-readable component name.
    pub name: String,

    /// LaTeX sub-expression.
    pub symbolic: String,

    /// Evaluated value of this component.
    pub value: Real,
}

/// The assembled result for one request. Fully immutable once built.
///
/// The analytic fields are `None` when the reconstruction degraded
/// (series-only output); the series fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZetaResult {
    /// The validated odd input.
    pub n: u32,

    /// Direct series partial sum over the full term count.
    pub series_value: Real,

    /// Every `(k, S_k)` pair, `k = 1..=term_count`.
    pub convergence_trace: Vec<ConvergencePoint>,

    /// LaTeX rendering of the reconstruction formula. `None` if the analytic
    /// engine degraded.
    pub symbolic_formula: Option<String>,

    /// Evaluated reconstruction value. `None` if the analytic engine degraded.
    pub reconstructed_value: Option<Real>,

    /// Term-by-term breakdown of the reconstruction. Empty if degraded.
    pub components: Vec<FormulaComponent>,

    /// Whether both methods agreed within the truncation-aware tolerance.
    /// `None` if the analytic engine degraded.
    pub methods_agree: Option<bool>,
}

impl ZetaResult {
    /// Whether the analytic path produced output for this result.
    pub fn has_reconstruction(&self) -> bool {
        self.reconstructed_value.is_some()
    }
}
