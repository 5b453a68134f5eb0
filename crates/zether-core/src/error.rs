//! Error types for Zether.

use thiserror::Error;

/// Zether error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any engine ran. The message names the violated
    /// constraint (range vs parity vs non-integer).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The analytic engine could not certify the requested precision.
    /// Callers degrade to series-only output instead of failing the request.
    #[error("Reconstruction unstable: {0}")]
    ReconstructionUnstable(String),

    /// Internal invariant breakage in a computation. There is no fallback;
    /// callers treat this as fatal.
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_constraint() {
        let e = Error::InvalidArgument("n must be odd, got 4".into());
        assert!(e.to_string().contains("n must be odd"));
    }
}
