//! Zether server — odd Riemann zeta values over HTTP.
//!
//! Serves the computation contract the existing front end consumes:
//!
//! # Endpoints
//!
//! - `GET /calculate?n=<odd 3..=53>` — series value, convergence trace,
//!   analytic reconstruction formula and component breakdown
//! - `GET /v1/health` — server status, version, request counters

mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use state::AppState;

/// Zether computation server.
#[derive(Parser, Debug)]
#[command(name = "zether-server", version = zether_core::VERSION, about)]
struct Cli {
    /// Port to listen on (the observed front end targets 8000).
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Bind address.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Maximum number of CPU threads for compute (0 = auto).
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Maximum request body size in MiB.
    #[arg(long, default_value = "1")]
    max_body_mb: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    let state = Arc::new(AppState::new());

    let app = Router::new()
        .merge(routes::router())
        .layer(DefaultBodyLimit::max(mb_to_bytes(cli.max_body_mb)))
        .layer(TraceLayer::new_for_http())
        // The front end is a browser app on another origin.
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    tracing::info!(%addr, version = zether_core::VERSION, "zether-server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn mb_to_bytes(mb: usize) -> usize {
    // Clamp overflow to usize::MAX to avoid panics in debug builds.
    mb.saturating_mul(1024).saturating_mul(1024)
}
