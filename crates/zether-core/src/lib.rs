//! # zether-core
//!
//! Shared foundations for the Zether odd-zeta computation engine:
//! - error taxonomy ([`Error`], [`Result`])
//! - the fixed-point high-precision real type ([`Real`]) used at every
//!   engine boundary
//! - the serde-serializable result data model ([`ZetaResult`] and friends)
//!
//! Higher crates (`zether-engine`, `zether-server`) depend on this crate and
//! never on each other's internals.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod precision;
pub mod types;

pub use error::{Error, Result};
pub use precision::Real;
pub use types::{ConvergencePoint, FormulaComponent, ZetaResult};

/// Crate version string (propagated to the server's `/v1/health` endpoint).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
