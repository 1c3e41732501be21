use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Player;
use crate::roster::{self, SetupError};

#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    /// Comma-separated players and `A & B` teams
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub players: Vec<Player>,
}

pub async fn setup_league(
    State(state): State<AppState>,
    Json(request): Json<SetupRequest>,
) -> Result<Json<SetupResponse>, ApiError> {
    let players = roster::setup_league(state.store.as_ref(), &request.text)
        .await
        .map_err(|e| match e {
            SetupError::Roster(reason) => ApiError::BadRequest(reason.to_string()),
            SetupError::Storage(source) => source.into(),
        })?;

    Ok(Json(SetupResponse { players }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_setup_creates_players() {
        let state = test_state();
        let (status, json) = post_json(
            build_router(state.clone()),
            "/api/league/setup",
            json!({ "text": "Nick & Tim, Paul & Steve" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["players"].as_array().unwrap().len(), 4);

        let (_, json) = get_json(build_router(state), "/api/players").await;
        assert_eq!(json["players"][0]["name"], "Nick");
    }

    #[tokio::test]
    async fn test_setup_rejects_small_roster() {
        let (status, json) = post_json(
            build_router(test_state()),
            "/api/league/setup",
            json!({ "text": "Nick & Tim" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("at least 4 unique players"));
    }
}
