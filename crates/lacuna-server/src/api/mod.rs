mod courses;
mod health;
mod holes;
mod iterations;
mod users;

use axum::Router;

use crate::AppState;

/// Create the API router
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(courses::router())
        .merge(holes::router())
        .merge(iterations::router())
}
