use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{load_summary, ApiError};
use crate::models::{MatchRecord, Player, PlayerStats};

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<Player>,
}

pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let players = state.store.list_players().await?;
    Ok(Json(PlayerListResponse { players }))
}

#[derive(Debug, Serialize)]
pub struct PlayerStatsResponse {
    /// Sorted by name
    pub players: Vec<PlayerStats>,
}

pub async fn list_player_stats(
    State(state): State<AppState>,
) -> Result<Json<PlayerStatsResponse>, ApiError> {
    let summary = load_summary(&state).await?;
    Ok(Json(PlayerStatsResponse {
        players: summary.player_stats.into_values().collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct PlayerProfileResponse {
    pub stats: PlayerStats,
    pub matches: Vec<MatchRecord>,
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PlayerProfileResponse>, ApiError> {
    let summary = load_summary(&state).await?;

    let (stats, matches) = summary
        .player_profile(&name)
        .ok_or_else(|| ApiError::NotFound(format!("Player '{}' has no matches", name)))?;

    Ok(Json(PlayerProfileResponse {
        stats: stats.clone(),
        matches,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn seeded_state() -> crate::api::state::AppState {
        let state = test_state();
        let text = "Ann,Bob,Cat,Dan,11,9,1,2024-01-15\n\
                    Annabelle,Cat,Bob,Dan,11,5,2,2024-01-16";
        let (status, _) = post_json(
            build_router(state.clone()),
            "/api/matches/bulk",
            json!({ "text": text }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        state
    }

    #[tokio::test]
    async fn test_list_players_sorted() {
        let state = seeded_state().await;
        let (status, json) = get_json(build_router(state), "/api/players").await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json["players"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ann", "Annabelle", "Bob", "Cat", "Dan"]);
    }

    #[tokio::test]
    async fn test_player_stats() {
        let state = seeded_state().await;
        let (_, json) = get_json(build_router(state), "/api/players/stats").await;
        let players = json["players"].as_array().unwrap();

        let cat = players.iter().find(|p| p["name"] == "Cat").unwrap();
        assert_eq!(cat["played"], 2);
        assert_eq!(cat["wins"], 1);
        assert_eq!(cat["win_rate"], 50);
    }

    #[tokio::test]
    async fn test_player_profile_is_exact() {
        let state = seeded_state().await;
        let (status, json) = get_json(build_router(state), "/api/players/Ann").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stats"]["played"], 1);
        assert_eq!(json["matches"].as_array().unwrap().len(), 1);
        assert_eq!(json["matches"][0]["team_a"], "Ann & Bob");
    }

    #[tokio::test]
    async fn test_unknown_player_is_404() {
        let state = seeded_state().await;
        let (status, json) = get_json(build_router(state), "/api/players/Zed").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
