//! REST API endpoints.
//!
//! Axum-based HTTP API over the league store. Every read rebuilds the
//! standings and player statistics from the full match list.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::calculate::LeagueSummary;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        if matches!(e, StorageError::InvalidPlayerName(_)) {
            return ApiError::BadRequest(e.to_string());
        }
        error!("Storage failure: {}", e);
        ApiError::Internal(e.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Load every match and aggregate it.
pub async fn load_summary(state: &AppState) -> Result<LeagueSummary, ApiError> {
    let records = state.store.list_matches_with_player_names().await?;
    Ok(LeagueSummary::from_matches(&records))
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }

    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            warn!("Ignoring unparseable CORS origin {:?}", origin);
            CorsLayer::new()
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/standings", get(routes::standings::get_standings))
        .route("/api/players", get(routes::players::list_players))
        .route("/api/players/stats", get(routes::players::list_player_stats))
        .route("/api/players/:name", get(routes::players::get_player))
        .route(
            "/api/matches",
            get(routes::matches::list_matches).post(routes::matches::add_match),
        )
        .route("/api/matches/weeks", get(routes::matches::list_weeks))
        .route(
            "/api/matches/bulk/preview",
            post(routes::matches::preview_bulk),
        )
        .route("/api/matches/bulk", post(routes::matches::upload_bulk))
        .route("/api/league/setup", post(routes::league::setup_league))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state());
        let (status, json) = get_json(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = build_router(test_state());
        let (status, _) = get_json(app, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_mapping() {
        let err: ApiError = StorageError::InvalidPlayerName("a|b".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let resp = ApiError::NotFound("player".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
