//! Endpoint handlers.
//!
//! Paths are matched exactly and only `GET` is served; any other method on a
//! known path is answered like an unknown path.

use std::time::Instant;

use axum::{extract::State, http::Method, Json};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::rotation::types::{ColorStats, Rotation};
use crate::store::{StorageError, StorageResult};

pub const RANDOM_COLOR_PATH: &str = "/random-color";
pub const COLOR_STATS_PATH: &str = "/color-stats";

/// `GET /random-color`: serve the next palette color and count it.
pub async fn random_color(
    State(state): State<AppState>,
    method: Method,
) -> Result<Json<Rotation>, ApiError> {
    require_get(&method)?;
    let start = Instant::now();

    let engine = state.engine.clone();
    match run_blocking(move || engine.next_color()).await {
        Ok(rotation) => {
            metrics::record_served(&rotation.current_color);
            metrics::record_request(method.as_str(), 200, RANDOM_COLOR_PATH, start);
            Ok(Json(rotation))
        }
        Err(e) => {
            tracing::error!(error = %e, "Rotation failed");
            metrics::record_storage_error("rotate");
            metrics::record_request(method.as_str(), 500, RANDOM_COLOR_PATH, start);
            Err(ApiError::Storage(e))
        }
    }
}

/// `GET /color-stats`: current visit table, read-only.
pub async fn color_stats(
    State(state): State<AppState>,
    method: Method,
) -> Result<Json<ColorStats>, ApiError> {
    require_get(&method)?;
    let start = Instant::now();

    let engine = state.engine.clone();
    match run_blocking(move || engine.stats()).await {
        Ok(stats) => {
            metrics::record_request(method.as_str(), 200, COLOR_STATS_PATH, start);
            Ok(Json(stats))
        }
        Err(e) => {
            tracing::error!(error = %e, "Reading color stats failed");
            metrics::record_storage_error("stats");
            metrics::record_request(method.as_str(), 500, COLOR_STATS_PATH, start);
            Err(ApiError::Storage(e))
        }
    }
}

/// Fallback for every unmatched request.
pub async fn not_found(method: Method, uri: axum::http::Uri) -> ApiError {
    tracing::debug!(method = %method, path = %uri.path(), "No endpoint matched");
    metrics::record_request(method.as_str(), 404, "none", Instant::now());
    ApiError::NotFound
}

fn require_get(method: &Method) -> Result<(), ApiError> {
    if *method == Method::GET {
        Ok(())
    } else {
        metrics::record_request(method.as_str(), 404, "none", Instant::now());
        Err(ApiError::NotFound)
    }
}

/// Run a blocking store call off the async workers.
async fn run_blocking<T, F>(f: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
}
