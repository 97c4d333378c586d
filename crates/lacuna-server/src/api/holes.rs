use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use lacuna_core::Rating;

use crate::db::models::CourseHole;
use crate::error::{AppError, Json, Path, Query};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseHolesQuery {
    user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    user_id: Option<i64>,
    rating: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    hole_id: String,
    points: f64,
}

async fn list_course_holes(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Query(query): Query<CourseHolesQuery>,
) -> Result<Json<Vec<CourseHole>>, AppError> {
    let user_id = query
        .user_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("courseId et userId sont requis.".to_string()))?;

    let holes = state.db.list_course_holes(course_id, user_id).await?;

    Ok(Json(holes))
}

/// Apply a rating to a (hole, user) pair. The rating string is parsed at
/// this boundary; scoring never sees an unrecognized value.
async fn review_hole(
    State(state): State<AppState>,
    Path(hole_id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let user_id = req
        .user_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("holeId, userId et rating sont requis.".to_string()))?;
    let rating: Rating = req
        .rating
        .ok_or_else(|| AppError::BadRequest("holeId, userId et rating sont requis.".to_string()))?
        .parse()
        .map_err(|_| AppError::BadRequest("rating invalide.".to_string()))?;

    let points = state.db.review_hole(&hole_id, user_id, rating).await?;

    Ok(Json(ReviewResponse { hole_id, points }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses/:course_id/holes", get(list_course_holes))
        .route("/holes/:hole_id/review", post(review_hole))
}
