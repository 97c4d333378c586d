use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User row as exposed to clients
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Full course record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course listing entry; content is omitted from listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseSummary {
    pub id: i64,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

/// A hole joined with the requesting user's accumulated points.
/// Holes the user never reviewed carry 0 points.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseHole {
    pub id: String,
    pub text: String,
    pub points: f64,
}
