//! Exact Bernoulli numbers with a process-wide memoization cache.
//!
//! The reconstruction of ζ(2m+1) needs Bernoulli numbers up to index
//! 2m + 2 (54 for the supported range), each used several times per request.
//! Values are exact `BigRational`s from the Akiyama–Tanigawa triangle, so
//! odd indices above 1 come out as exact zeros — important for keeping the
//! symbolic coefficient assembly exact.
//!
//! Sign convention: B₁ = +1/2 (the convention the triangle produces).

use std::sync::RwLock;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

/// Append-only cache of Bernoulli numbers `B_0..=B_max`.
///
/// Read-mostly: `get` takes the read lock on the hot path and only upgrades
/// to the write lock when the prefix has to grow. Intended to be shared via
/// `Arc` and injected into the engines that need it, so tests can substitute
/// a fresh cache per run.
pub struct BernoulliCache {
    values: RwLock<Vec<BigRational>>,
}

impl BernoulliCache {
    /// Empty cache.
    pub fn new() -> Self {
        BernoulliCache { values: RwLock::new(Vec::new()) }
    }

    /// The `index`-th Bernoulli number, computing and memoizing the prefix
    /// `B_0..=B_index` on first demand.
    pub fn get(&self, index: usize) -> BigRational {
        {
            let values = self.values.read().unwrap_or_else(|e| e.into_inner());
            if let Some(v) = values.get(index) {
                return v.clone();
            }
        }
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        if index >= values.len() {
            *values = akiyama_tanigawa(index);
        }
        values[index].clone()
    }

    /// Number of memoized values.
    pub fn len(&self) -> usize {
        self.values.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BernoulliCache {
    fn default() -> Self {
        Self::new()
    }
}

/// `B_0..=B_limit` by the Akiyama–Tanigawa transform.
///
/// Row update: seed `a_m = 1/(m+1)`, then fold right-to-left with
/// `a_{j-1} ← j·(a_{j-1} − a_j)`; after processing row m, `a_0 = B_m`.
fn akiyama_tanigawa(limit: usize) -> Vec<BigRational> {
    let mut row: Vec<BigRational> = Vec::with_capacity(limit + 1);
    let mut out = Vec::with_capacity(limit + 1);
    for m in 0..=limit {
        row.push(BigRational::new(BigInt::one(), BigInt::from(m as u64 + 1)));
        for j in (1..=m).rev() {
            let diff = &row[j - 1] - &row[j];
            row[j - 1] = diff * BigInt::from(j as u64);
        }
        out.push(row[0].clone());
    }
    out
}

/// `k!` as an arbitrary-precision integer.
pub fn factorial(k: usize) -> BigInt {
    (1..=k as u64).fold(BigInt::one(), |acc, i| acc * i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_small_values() {
        let cache = BernoulliCache::new();
        assert_eq!(cache.get(0), ratio(1, 1));
        assert_eq!(cache.get(1), ratio(1, 2));
        assert_eq!(cache.get(2), ratio(1, 6));
        assert_eq!(cache.get(4), ratio(-1, 30));
        assert_eq!(cache.get(6), ratio(1, 42));
        assert_eq!(cache.get(12), ratio(-691, 2730));
    }

    #[test]
    fn test_odd_indices_above_one_are_exact_zero() {
        let cache = BernoulliCache::new();
        for index in [3, 5, 7, 21, 53] {
            assert!(cache.get(index).is_zero(), "B_{} must be exactly zero", index);
        }
    }

    #[test]
    fn test_cache_grows_once_and_is_reused() {
        let cache = BernoulliCache::new();
        assert!(cache.is_empty());
        let first = cache.get(10);
        let len_after = cache.len();
        assert_eq!(len_after, 11);
        // A smaller index must not shrink or recompute the prefix.
        let _ = cache.get(4);
        assert_eq!(cache.len(), len_after);
        assert_eq!(cache.get(10), first);
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0), BigInt::one());
        assert_eq!(factorial(5), BigInt::from(120));
        assert_eq!(factorial(20), BigInt::from(2_432_902_008_176_640_000u64));
    }
}
