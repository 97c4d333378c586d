use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde::Deserialize;

use crate::db::models::User;
use crate::error::{AppError, Json, Query};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UserLookupQuery {
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    username: Option<String>,
}

/// Look up a user by display handle. 404 on an unknown handle: the client
/// probes this before registering, so "not found" is an expected outcome.
async fn lookup_user(
    State(state): State<AppState>,
    Query(query): Query<UserLookupQuery>,
) -> Result<Json<User>, AppError> {
    let username = query
        .username
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("Le paramètre username est requis.".to_string()))?;

    let user = state
        .db
        .find_user_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("Utilisateur introuvable.".to_string()))?;

    Ok(Json(user))
}

async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let username = req
        .username
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("Le champ username est requis.".to_string()))?;

    let user = state.db.create_user(&username).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(lookup_user).post(create_user))
}
