use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::{load_summary, ApiError};
use crate::calculate::{group_by_week, search_matches, WeekGroup};
use crate::ingest::{self, AddMatchError, BulkPreview};
use crate::models::{MatchRecord, MatchSubmission, StoredMatch};

#[derive(Debug, Deserialize)]
pub struct ListMatchesParams {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchRecord>,
    pub total: usize,
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListMatchesParams>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let summary = load_summary(&state).await?;

    let matches = match params.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => search_matches(&summary.matches, term),
        _ => summary.matches,
    };

    Ok(Json(MatchListResponse {
        total: matches.len(),
        matches,
    }))
}

#[derive(Debug, Serialize)]
pub struct WeekListResponse {
    pub weeks: Vec<WeekGroup>,
}

pub async fn list_weeks(
    State(state): State<AppState>,
) -> Result<Json<WeekListResponse>, ApiError> {
    let summary = load_summary(&state).await?;
    Ok(Json(WeekListResponse {
        weeks: group_by_week(&summary.matches),
    }))
}

pub async fn add_match(
    State(state): State<AppState>,
    Json(submission): Json<MatchSubmission>,
) -> Result<(StatusCode, Json<StoredMatch>), ApiError> {
    let stored = ingest::add_match(state.store.as_ref(), &submission)
        .await
        .map_err(|e| match e {
            AddMatchError::Invalid(reason) => ApiError::BadRequest(reason.to_string()),
            AddMatchError::Storage(source) => source.into(),
        })?;

    Ok((StatusCode::CREATED, Json(stored)))
}

#[derive(Debug, Deserialize)]
pub struct BulkTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct BulkPreviewResponse {
    pub summary: String,
    #[serde(flatten)]
    pub preview: BulkPreview,
}

pub async fn preview_bulk(
    Json(request): Json<BulkTextRequest>,
) -> Result<Json<BulkPreviewResponse>, ApiError> {
    let preview =
        ingest::preview_bulk(&request.text).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(Json(BulkPreviewResponse {
        summary: preview.summary(),
        preview,
    }))
}

#[derive(Debug, Serialize)]
pub struct BulkUploadResponse {
    pub committed: usize,
}

pub async fn upload_bulk(
    State(state): State<AppState>,
    Json(request): Json<BulkTextRequest>,
) -> Result<Json<BulkUploadResponse>, ApiError> {
    let matches =
        ingest::parse_bulk_text(&request.text).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let stored = ingest::commit_batch(state.store.as_ref(), &matches)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("Bulk upload stored {} matches", stored.len());
    Ok(Json(BulkUploadResponse {
        committed: stored.len(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    const TEXT: &str = "Nick,Tim,Udi,Dan,13,15,3,2024-01-15\n\
                        Paul,Steve,Nick,Dan,11,4,1,2024-01-22";

    #[tokio::test]
    async fn test_preview_does_not_write() {
        let state = test_state();
        let (status, json) = post_json(
            build_router(state.clone()),
            "/api/matches/bulk/preview",
            json!({ "text": TEXT }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["summary"], "2 matches");
        assert_eq!(json["rows"][0]["score"], "13 - 15");

        let (_, json) = get_json(build_router(state), "/api/matches").await;
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn test_bulk_parse_error_is_400() {
        let (status, json) = post_json(
            build_router(test_state()),
            "/api/matches/bulk",
            json!({ "text": "A,B,C,D,11,11,1" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.contains("Line 1"));
    }

    #[tokio::test]
    async fn test_upload_then_list_and_search() {
        let state = test_state();
        let (status, json) = post_json(
            build_router(state.clone()),
            "/api/matches/bulk",
            json!({ "text": TEXT }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["committed"], 2);

        let (_, json) = get_json(build_router(state.clone()), "/api/matches").await;
        assert_eq!(json["total"], 2);
        assert_eq!(json["matches"][0]["date"], "2024-01-22");
        assert_eq!(json["matches"][1]["team_b"], "Dan & Udi");

        let (_, json) = get_json(build_router(state.clone()), "/api/matches?search=udi").await;
        assert_eq!(json["total"], 1);

        let (_, json) = get_json(build_router(state), "/api/matches/weeks").await;
        let weeks = json["weeks"].as_array().unwrap();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0]["label"], "Week of January 21");
    }

    #[tokio::test]
    async fn test_add_match_validation() {
        let state = test_state();
        let mut body = json!({
            "team_a_player1": "Nick",
            "team_a_player2": "Tim",
            "team_b_player1": "Paul",
            "team_b_player2": "Steve",
            "team_a_score": 11,
            "team_b_score": 11,
            "game_number": 1,
            "match_date": "2024-01-15"
        });

        let (status, json) =
            post_json(build_router(state.clone()), "/api/matches", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("cannot end in a tie"));

        body["team_b_score"] = json!(9);
        let (status, json) = post_json(build_router(state.clone()), "/api/matches", body).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["team_a_score"], 11);

        let (_, json) = get_json(build_router(state), "/api/standings").await;
        assert_eq!(json["standings"][0]["name"], "Nick & Tim");
    }

    #[tokio::test]
    async fn test_add_match_rejects_padded_duplicate() {
        let state = test_state();
        let body = json!({
            "team_a_player1": "Nick",
            "team_a_player2": "Tim",
            "team_b_player1": "Tim ",
            "team_b_player2": "Steve",
            "team_a_score": 11,
            "team_b_score": 9,
            "game_number": 1,
            "match_date": "2024-01-15"
        });

        let (status, json) = post_json(build_router(state.clone()), "/api/matches", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("only be selected once"));

        let (_, json) = get_json(build_router(state.clone()), "/api/matches").await;
        assert_eq!(json["total"], 0);
        let (_, json) = get_json(build_router(state), "/api/players").await;
        assert_eq!(json["players"], json!([]));
    }
}
