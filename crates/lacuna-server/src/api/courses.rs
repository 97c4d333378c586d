use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use lacuna_core::HoleMatch;

use crate::db::models::{Course, CourseSummary};
use crate::error::{AppError, Json, Path, Query};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListQuery {
    user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    user_id: Option<i64>,
    title: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    title: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SyncHolesRequest {
    holes: Option<Vec<HoleMatch>>,
}

#[derive(Debug, Serialize)]
pub struct SyncHolesResponse {
    synced: usize,
}

async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    let user_id = query
        .user_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("Le paramètre userId est requis.".to_string()))?;

    let courses = state.db.list_courses(user_id).await?;

    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let user_id = req.user_id.filter(|id| *id > 0);
    let title = req.title.filter(|title| !title.is_empty());
    let (user_id, title) = match (user_id, title) {
        (Some(user_id), Some(title)) => (user_id, title),
        _ => {
            return Err(AppError::BadRequest("userId et title sont requis.".to_string()));
        }
    };

    let content = req.content.unwrap_or_default();
    let course = state.db.create_course(user_id, &title, &content).await?;

    Ok((StatusCode::CREATED, Json(course)))
}

async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = state
        .db
        .get_course(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cours introuvable.".to_string()))?;

    Ok(Json(course))
}

async fn update_course(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    if req.title.is_none() && req.content.is_none() {
        return Err(AppError::BadRequest("Aucun champ à mettre à jour.".to_string()));
    }

    let course = state
        .db
        .update_course(course_id, req.title.as_deref(), req.content.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("Cours introuvable.".to_string()))?;

    Ok(Json(course))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.db.delete_course(course_id).await? {
        return Err(AppError::NotFound("Cours introuvable.".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Reconcile the holes extracted from a course's saved content. Reports how
/// many entries were processed; holes missing from the payload stay stored.
async fn sync_holes(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(req): Json<SyncHolesRequest>,
) -> Result<Json<SyncHolesResponse>, AppError> {
    let holes = req
        .holes
        .ok_or_else(|| AppError::BadRequest("holes doit être un tableau.".to_string()))?;

    let synced = state.db.sync_holes(course_id, &holes).await?;

    Ok(Json(SyncHolesResponse { synced }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/:course_id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/courses/:course_id/sync-holes", post(sync_holes))
}
