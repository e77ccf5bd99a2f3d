//! Leaderboard HTTP handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, error};

use crate::leaderboard::{resolve_limit, LeaderboardRepo, NewRecord};
use crate::protocol::{ErrorBody, ScoreSubmission};
use crate::state::AppState;

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

/// GET /api/leaderboard?limit=N
pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let limit = resolve_limit(params.get("limit").map(String::as_str));

    match LeaderboardRepo::top(&state.pool, limit, state.ranking_mode).await {
        Ok(list) => Json(list).into_response(),
        Err(e) => {
            error!("Failed to fetch leaderboard: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch leaderboard")
        }
    }
}

/// POST /api/leaderboard
pub async fn submit_score(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let submission = match payload
        .map_err(|e| e.body_text())
        .and_then(|Json(value)| ScoreSubmission::validate(&value).map_err(|e| e.to_string()))
    {
        Ok(submission) => submission,
        Err(reason) => {
            debug!("Rejected submission: {}", reason);
            return error_response(StatusCode::BAD_REQUEST, "Invalid payload");
        }
    };

    let record = NewRecord::submission(submission.name, submission.score);
    match LeaderboardRepo::insert(&state.pool, &record).await {
        Ok(id) => {
            debug!("Stored score {} for {} (row {})", record.score, record.name, id);
            StatusCode::OK.into_response()
        }
        Err(e) => {
            error!("Failed to submit score: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to submit score")
        }
    }
}

/// Health check endpoint
pub async fn health_handler() -> &'static str {
    "OK"
}
