use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use incidash_source::config::validate_limit;
use incidash_source::feed::IncidentFeed;
use incidash_source::proxy::INCIDENTS_ROUTE;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Client-facing body for every upstream failure. Upstream detail stays in the logs.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch incidents";

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<dyn IncidentFeed>,
    pub fetch_limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct IncidentsQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub commit: Option<String>,
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

async fn list_incidents(
    State(state): State<AppState>,
    query: Result<Query<IncidentsQuery>, QueryRejection>,
) -> Response {
    let requested = match query {
        Ok(Query(q)) => q.limit,
        Err(rejection) => {
            warn!(err = %rejection, "rejected incidents query");
            return message(StatusCode::BAD_REQUEST, "Invalid limit");
        }
    };
    let limit = match requested.map(validate_limit) {
        None => state.fetch_limit,
        Some(Ok(limit)) => limit,
        Some(Err(err)) => {
            warn!(details = ?err.details, "rejected incidents limit");
            return message(StatusCode::BAD_REQUEST, "Invalid limit");
        }
    };

    let feed = state.feed.clone();
    match tokio::task::spawn_blocking(move || feed.fetch_raw(limit)).await {
        Ok(Ok(body)) => {
            info!(limit, bytes = body.len(), "relayed incidents");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response()
        }
        Ok(Err(err)) => {
            error!(
                code = %err.code,
                reason = %err.message,
                details = ?err.details,
                "Error fetching incidents"
            );
            message(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED_MESSAGE)
        }
        Err(join) => {
            error!(err = %join, "incident fetch task failed");
            message(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED_MESSAGE)
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: option_env!("GIT_COMMIT_HASH").map(str::to_string),
    })
}

/// Proxy router: `GET /api/incidents` and `GET /health`, CORS limited to `cors_origin`.
pub fn build_router(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET]);

    Router::new()
        .route(INCIDENTS_ROUTE, get(list_incidents))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
