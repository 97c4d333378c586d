use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Json};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    user_id: Option<i64>,
    course_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    updated: u64,
}

/// Decay every point value in scope by 1, floored at 0. Zero matching rows
/// is a successful 0, not an error.
async fn advance_iteration(
    State(state): State<AppState>,
    Json(req): Json<AdvanceRequest>,
) -> Result<Json<AdvanceResponse>, AppError> {
    let user_id = req
        .user_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("userId est requis.".to_string()))?;
    // A non-positive course id behaves like no scope at all.
    let course_id = req.course_id.filter(|id| *id > 0);

    let updated = state.db.advance_iteration(user_id, course_id).await?;

    Ok(Json(AdvanceResponse { updated }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/iterations/advance", post(advance_iteration))
}
