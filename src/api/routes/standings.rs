use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{load_summary, ApiError};
use crate::models::TeamStats;

#[derive(Debug, Serialize)]
pub struct RankedTeam {
    /// 1-based position in the table
    pub rank: usize,

    #[serde(flatten)]
    pub stats: TeamStats,
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub standings: Vec<RankedTeam>,
    pub total_matches: usize,
}

pub async fn get_standings(
    State(state): State<AppState>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let summary = load_summary(&state).await?;

    let standings = summary
        .standings
        .into_iter()
        .enumerate()
        .map(|(i, stats)| RankedTeam { rank: i + 1, stats })
        .collect();

    Ok(Json(StandingsResponse {
        standings,
        total_matches: summary.matches.len(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_standings_empty() {
        let (status, json) = get_json(build_router(test_state()), "/api/standings").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["standings"], json!([]));
        assert_eq!(json["total_matches"], 0);
    }

    #[tokio::test]
    async fn test_standings_are_ranked() {
        let state = test_state();
        let text = "Nick,Tim,Udi,Dan,13,15,3,2024-01-15\nTim,Nick,Paul,Steve,14,12,4,2024-01-15";
        let (status, _) = post_json(
            build_router(state.clone()),
            "/api/matches/bulk",
            json!({ "text": text }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = get_json(build_router(state), "/api/standings").await;
        let table = json["standings"].as_array().unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table[0]["rank"], 1);
        assert_eq!(table[0]["name"], "Dan & Udi");
        assert_eq!(table[0]["points_difference"], 2);
        assert_eq!(table[1]["name"], "Nick & Tim");
        assert_eq!(table[1]["played"], 2);
        assert_eq!(table[2]["rank"], 3);
        assert_eq!(json["total_matches"], 2);
    }
}
