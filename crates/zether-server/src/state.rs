//! Shared application state for the Zether server.

use std::sync::Arc;
use std::time::Instant;

use zether_engine::{BernoulliCache, ResultAssembler};

/// Shared state available to all request handlers.
pub struct AppState {
    /// The engine orchestrator. Stateless per request; the Bernoulli cache
    /// behind it is the only shared mutable state and is safe for concurrent
    /// readers.
    pub assembler: ResultAssembler,

    /// Server start time (for uptime reporting).
    pub started_at: Instant,

    /// In-flight request counter (for /v1/health).
    pub inflight: std::sync::atomic::AtomicU64,

    /// Total requests served (for /v1/health).
    pub total_requests: std::sync::atomic::AtomicU64,
}

impl AppState {
    /// Fresh state with its own Bernoulli cache.
    pub fn new() -> Self {
        AppState {
            assembler: ResultAssembler::new(Arc::new(BernoulliCache::new())),
            started_at: Instant::now(),
            inflight: std::sync::atomic::AtomicU64::new(0),
            total_requests: std::sync::atomic::AtomicU64::new(0),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias used in axum handlers.
pub type SharedState = Arc<AppState>;
