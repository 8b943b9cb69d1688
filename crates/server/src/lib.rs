//! HTTP API.
//!
//! Every response body is the `{success, data?, error?, message?}`
//! envelope, except the CSV export download.
//!
//! | Route                               | Handler |
//! |-------------------------------------|---------|
//! | `GET /api/ping`, `/api/health`      | service checks |
//! | `GET /api/sponsors/...`             | search, stats and facets over the built-in catalog |
//! | `GET /api/data/...`                 | tabular datasets, their search, industries and CSV export |
//! | `GET /api/uk-gov/...`, `POST .../schedule` | live register ingestion |

use std::future::Future;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod refresh;
pub mod routes;
pub mod state;

pub use error::{AppError, ServerError};
pub use state::AppState;

use routes::*;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/ping", get(ping_handler))
        .route("/api/health", get(health_handler))
        .route("/api/sponsors/search", get(search_handler))
        .route("/api/sponsors/stats", get(stats_handler))
        .route("/api/sponsors/industries", get(industries_handler))
        .route("/api/sponsors/locations", get(locations_handler))
        .route("/api/sponsors/{id}", get(sponsor_handler))
        .route("/api/data/stats", get(data_stats_handler))
        .route("/api/data/{section}", get(data_section_handler))
        .route("/api/data/{section}/search", get(data_search_handler))
        .route("/api/data/{section}/industries", get(data_industries_handler))
        .route("/api/data/{section}/export", get(data_export_handler))
        .route("/api/uk-gov/sync", get(sync_handler))
        .route("/api/uk-gov/status", get(status_handler))
        .route("/api/uk-gov/latest", get(latest_handler))
        .route("/api/uk-gov/schedule", post(schedule_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve until Ctrl+C / SIGTERM.
///
/// `state` must be built before entering the runtime: the register client
/// wraps a blocking reqwest client, which owns a runtime of its own.
pub async fn start_server(state: AppState) -> Result<(), ServerError> {
    let address = state.settings.bind_addr();

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind { addr: address.clone(), source })?;
    info!("Server running on {address}");

    serve(listener, state, shutdown_signal()).await?;

    info!("Server shut down");
    Ok(())
}

/// Run the API on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(catalog = state.catalog.len(), data_dir = %state.settings.data.dir.display(), "state ready");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
