pub mod models;

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::AppError;
use lacuna_core::{HoleMatch, Rating};
use models::{Course, CourseHole, CourseSummary, User};

/// Database connection wrapper
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database, creating the file on first run
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Cheap round-trip used by the health endpoint
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Look up a user by display handle. An unknown handle is a regular
    /// `None` outcome; the login flow probes it before registering.
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Create a user with a unique display handle
    pub async fn create_user(&self, username: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username) VALUES (?) RETURNING id, username",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Ce pseudo est déjà utilisé.".to_string())
            }
            other => AppError::from(other),
        })?;

        Ok(user)
    }

    /// List a user's courses, most recently updated first
    pub async fn list_courses(&self, user_id: i64) -> Result<Vec<CourseSummary>, AppError> {
        let courses = sqlx::query_as::<_, CourseSummary>(
            "SELECT id, title, updated_at FROM courses WHERE user_id = ? ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    /// Create a course for a user
    pub async fn create_course(
        &self,
        user_id: i64,
        title: &str,
        content: &str,
    ) -> Result<Course, AppError> {
        let now = Utc::now();
        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses (user_id, title, content, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, user_id, title, content, created_at, updated_at",
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::BadRequest("Utilisateur inconnu.".to_string())
            }
            other => AppError::from(other),
        })?;

        Ok(course)
    }

    /// Get a course by id
    pub async fn get_course(&self, id: i64) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(
            "SELECT id, user_id, title, content, created_at, updated_at FROM courses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// Update a course's title and/or content, refreshing `updated_at`.
    /// Returns `None` when the course does not exist.
    pub async fn update_course(
        &self,
        id: i64,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(
            "UPDATE courses \
             SET title = COALESCE(?, title), content = COALESCE(?, content), updated_at = ? \
             WHERE id = ? \
             RETURNING id, user_id, title, content, created_at, updated_at",
        )
        .bind(title)
        .bind(content)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// Delete a course and everything hanging off it. Children go first:
    /// foreign keys are enforced. Returns whether the course existed.
    pub async fn delete_course(&self, id: i64) -> Result<bool, AppError> {
        sqlx::query(
            "DELETE FROM hole_states WHERE hole_id IN (SELECT id FROM holes WHERE course_id = ?)",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        sqlx::query("DELETE FROM holes WHERE course_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reconcile extracted holes into storage, keyed by hole id.
    ///
    /// Each entry is upserted independently: existing ids get their text and
    /// course association overwritten, new ids are inserted. Holes stored for
    /// the course but absent from `holes` are intentionally left untouched,
    /// preserving review history for text that was edited away. Returns the
    /// number of holes processed, which makes the operation idempotent from
    /// the caller's point of view.
    pub async fn sync_holes(&self, course_id: i64, holes: &[HoleMatch]) -> Result<usize, AppError> {
        let course: Option<i64> = sqlx::query_scalar("SELECT id FROM courses WHERE id = ?")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;
        if course.is_none() {
            return Err(AppError::NotFound("Cours introuvable.".to_string()));
        }

        for hole in holes {
            sqlx::query(
                "INSERT INTO holes (id, course_id, original_text) VALUES (?, ?, ?) \
                 ON CONFLICT(id) DO UPDATE SET \
                 original_text = excluded.original_text, course_id = excluded.course_id",
            )
            .bind(&hole.id)
            .bind(course_id)
            .bind(&hole.text)
            .execute(&self.pool)
            .await?;
        }

        Ok(holes.len())
    }

    /// List a course's holes with the given user's points, 0 when the user
    /// never reviewed a hole
    pub async fn list_course_holes(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Vec<CourseHole>, AppError> {
        let holes = sqlx::query_as::<_, CourseHole>(
            "SELECT h.id, h.original_text AS text, IFNULL(s.points, 0.0) AS points \
             FROM holes h \
             LEFT JOIN hole_states s ON s.hole_id = h.id AND s.user_id = ? \
             WHERE h.course_id = ? \
             ORDER BY h.id",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(holes)
    }

    /// Apply a review rating to a (hole, user) pair and return the new
    /// point value.
    ///
    /// Read-modify-write: two racing reviews of the same pair may lose an
    /// update. The state row is materialized on first review.
    pub async fn review_hole(
        &self,
        hole_id: &str,
        user_id: i64,
        rating: Rating,
    ) -> Result<f64, AppError> {
        let current: Option<f64> =
            sqlx::query_scalar("SELECT points FROM hole_states WHERE hole_id = ? AND user_id = ?")
                .bind(hole_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        let points = rating.apply(current.unwrap_or(0.0));

        sqlx::query(
            "INSERT INTO hole_states (hole_id, user_id, points, updated_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT(hole_id, user_id) DO UPDATE SET \
             points = excluded.points, updated_at = excluded.updated_at",
        )
        .bind(hole_id)
        .bind(user_id)
        .bind(points)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::BadRequest("Trou ou utilisateur inconnu.".to_string())
            }
            other => AppError::from(other),
        })?;

        Ok(points)
    }

    /// Decrement every matching state's points by 1, floored at 0, and
    /// return the number of rows touched. Scoped to one user, optionally
    /// restricted to the holes of one course. Rows already at 0 still count.
    pub async fn advance_iteration(
        &self,
        user_id: i64,
        course_id: Option<i64>,
    ) -> Result<u64, AppError> {
        let now = Utc::now();

        let result = match course_id {
            Some(course_id) => {
                sqlx::query(
                    "UPDATE hole_states SET points = MAX(points - 1, 0), updated_at = ? \
                     WHERE user_id = ? \
                     AND hole_id IN (SELECT id FROM holes WHERE course_id = ?)",
                )
                .bind(now)
                .bind(user_id)
                .bind(course_id)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE hole_states SET points = MAX(points - 1, 0), updated_at = ? \
                     WHERE user_id = ?",
                )
                .bind(now)
                .bind(user_id)
                .execute(&self.pool)
                .await?
            }
        };

        Ok(result.rows_affected())
    }
}
