//! HTTP route handlers for the Zether server.
//!
//! `GET /calculate` preserves the contract the existing front end binds to:
//! `series_value` (45-digit decimal string), `convergence_data`
//! (`[term, partialSum]` pair array), `recursion` (LaTeX string, null when
//! the analytic path degraded), and `components` (`{name, symbolic, value}`).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use zether_core::{Error, ZetaResult};

use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/calculate", get(calculate_handler))
        .route("/v1/health", get(health_handler))
}

// ---------------------------------------------------------------------------
// GET /calculate
// ---------------------------------------------------------------------------

/// Query parameters for `/calculate`.
///
/// `n` is accepted as a float so that non-integer inputs get a precise
/// rejection message instead of a generic deserialization failure.
#[derive(Debug, Deserialize)]
struct CalculateQuery {
    n: f64,
}

/// One formula component on the wire. The value is lowered to `f64` because
/// the charting front end consumes it as a number; the exact digits live in
/// `series_value` / `reconstructed_value`.
#[derive(Debug, Serialize)]
struct ComponentResponse {
    name: String,
    symbolic: String,
    value: f64,
}

/// Response body for `/calculate`.
#[derive(Debug, Serialize)]
struct CalculateResponse {
    n: u32,
    /// 45-digit decimal string.
    series_value: String,
    /// `[term, partialSum]` pairs, f64 partial sums for charting.
    convergence_data: Vec<(u32, f64)>,
    /// LaTeX reconstruction formula; `null` when degraded to series-only.
    recursion: Option<String>,
    /// 45-digit decimal string; `null` when degraded.
    reconstructed_value: Option<String>,
    components: Vec<ComponentResponse>,
    /// Cross-check outcome; `null` when degraded.
    methods_agree: Option<bool>,
    wall_time_s: f64,
}

async fn calculate_handler(
    State(state): State<SharedState>,
    Query(query): Query<CalculateQuery>,
) -> Result<Json<CalculateResponse>, AppError> {
    state.inflight.fetch_add(1, Ordering::Relaxed);
    let _dec = DecrementOnDrop(&state.inflight);
    state.total_requests.fetch_add(1, Ordering::Relaxed);

    if !query.n.is_finite() || query.n.fract() != 0.0 {
        return Err(AppError::bad_request(format!(
            "n must be an integer, got {}",
            query.n
        )));
    }
    let n = query.n as i64;

    let worker = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        let t0 = Instant::now();
        let result = worker.assembler.assemble(n).map_err(AppError::from)?;
        Ok(build_response(result, t0.elapsed().as_secs_f64()))
    })
    .await
    .map_err(|e| AppError::internal(format!("task panicked: {e}")))?;

    result.map(Json)
}

fn build_response(result: ZetaResult, wall_time_s: f64) -> CalculateResponse {
    let convergence_data = result
        .convergence_trace
        .iter()
        .map(|p| (p.term, p.partial_sum.to_f64()))
        .collect();
    let components = result
        .components
        .into_iter()
        .map(|c| ComponentResponse {
            name: c.name,
            symbolic: c.symbolic,
            value: c.value.to_f64(),
        })
        .collect();
    CalculateResponse {
        n: result.n,
        series_value: result.series_value.to_string(),
        convergence_data,
        recursion: result.symbolic_formula,
        reconstructed_value: result.reconstructed_value.map(|v| v.to_string()),
        components,
        methods_agree: result.methods_agree,
        wall_time_s,
    }
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_s: f64,
    inflight: u64,
    total_requests: u64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: zether_core::VERSION,
        uptime_s: state.started_at.elapsed().as_secs_f64(),
        inflight: state.inflight.load(Ordering::Relaxed),
        total_requests: state.total_requests.load(Ordering::Relaxed),
    })
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Structured JSON error response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request(msg: String) -> Self {
        AppError { status: StatusCode::BAD_REQUEST, message: msg }
    }

    fn internal(msg: String) -> Self {
        AppError { status: StatusCode::INTERNAL_SERVER_ERROR, message: msg }
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        match e {
            Error::InvalidArgument(_) => AppError::bad_request(e.to_string()),
            // Instability is absorbed by the assembler; anything else
            // reaching here is an internal fault.
            Error::ReconstructionUnstable(_) | Error::Computation(_) => {
                AppError::internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

struct DecrementOnDrop<'a>(&'a AtomicU64);

impl Drop for DecrementOnDrop<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use zether_engine::{BernoulliCache, ResultAssembler};

    #[test]
    fn test_wire_shape_matches_front_end_contract() {
        let assembler = ResultAssembler::new(Arc::new(BernoulliCache::new()));
        let result = assembler.assemble(3).unwrap();
        let response = build_response(result, 0.1);
        let json = serde_json::to_value(&response).unwrap();

        // series_value: 45-digit decimal string.
        let series = json["series_value"].as_str().unwrap();
        assert_eq!(series.split('.').nth(1).unwrap().len(), 45);
        // Partial sum trails the limit by ~1.25e-7 at n = 3.
        assert!(series.starts_with("1.202056"));

        // convergence_data: array of [term, partialSum] pairs.
        let data = json["convergence_data"].as_array().unwrap();
        assert_eq!(data.len(), 2000);
        assert_eq!(data[0][0], 1);
        assert!(data[0][1].as_f64().unwrap() > 0.99);

        // recursion: LaTeX string; components: {name, symbolic, value}.
        assert!(json["recursion"].as_str().unwrap().starts_with("\\zeta(3)"));
        let comp = &json["components"].as_array().unwrap()[0];
        assert!(comp["name"].is_string());
        assert!(comp["symbolic"].is_string());
        assert!(comp["value"].is_f64());

        assert_eq!(json["methods_agree"], true);
    }

    #[test]
    fn test_error_mapping() {
        let invalid = AppError::from(Error::InvalidArgument("n must be odd, got 4".into()));
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        let internal = AppError::from(Error::Computation("boom".into()));
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
