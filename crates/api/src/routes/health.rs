use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when Postgres is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Cache failures only slow region/city lists down, so they never degrade status.
    pub cache_healthy: bool,
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (db, cache) = tokio::join!(
        kindquest_db::health_check(&state.pool),
        state.cache.get("health:ping"),
    );
    let db_healthy = db.is_ok();

    let (code, status) = if db_healthy {
        (StatusCode::OK, "ok")
    } else {
        tracing::error!("Health check could not reach the database");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        cache_healthy: cache.is_ok(),
    };
    (code, Json(body))
}

/// Mounted at the root, outside the versioned API.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
