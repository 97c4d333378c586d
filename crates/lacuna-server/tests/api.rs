use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use lacuna_core::extract_holes;
use lacuna_server::db::Database;
use lacuna_server::{app, AppState};

async fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let db = Database::connect(&url).await.unwrap();
    db.migrate().await.unwrap();
    (app(AppState { db }), dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn create_user(app: &Router, username: &str) -> i64 {
    let (status, body) = send(app, "POST", "/users", Some(json!({ "username": username }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_course(app: &Router, user_id: i64, title: &str, content: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/courses",
        Some(json!({ "userId": user_id, "title": title, "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn login_probe_then_register() {
    let (app, _dir) = test_app().await;

    let (status, _) = send(&app, "GET", "/users?username=margaux", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "POST", "/users", Some(json!({ "username": "margaux" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "margaux");
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/users?username=margaux", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64(), Some(id));
}

#[tokio::test]
async fn missing_username_param_is_rejected() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (app, _dir) = test_app().await;
    create_user(&app, "margaux").await;

    let (status, body) = send(&app, "POST", "/users", Some(json!({ "username": "margaux" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Ce pseudo est déjà utilisé.");
}

#[tokio::test]
async fn course_without_content_defaults_to_empty() {
    let (app, _dir) = test_app().await;
    let user_id = create_user(&app, "margaux").await;

    let (status, body) = send(
        &app,
        "POST",
        "/courses",
        Some(json!({ "userId": user_id, "title": "Math" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["content"], "");
    assert_eq!(body["title"], "Math");
}

#[tokio::test]
async fn course_crud_round_trip() {
    let (app, _dir) = test_app().await;
    let user_id = create_user(&app, "margaux").await;
    let course_id = create_course(&app, user_id, "Chimie", "<p>acide</p>").await;

    let (status, body) = send(&app, "GET", &format!("/courses/{course_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "<p>acide</p>");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/courses/{course_id}"),
        Some(json!({ "title": "Chimie organique" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Chimie organique");
    assert_eq!(body["content"], "<p>acide</p>");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/courses/{course_id}"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Aucun champ à mettre à jour.");

    let (status, _) = send(&app, "DELETE", &format!("/courses/{course_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/courses/{course_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/courses/{course_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_course_id_in_path_is_rejected() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(&app, "GET", "/courses/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Identifiant de cours invalide.");
}

#[tokio::test]
async fn course_listing_requires_user_id() {
    let (app, _dir) = test_app().await;

    let (status, _) = send(&app, "GET", "/courses", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hole_lifecycle_from_content_to_review() {
    let (app, _dir) = test_app().await;
    let user_id = create_user(&app, "margaux").await;

    let content = "A [[HOLE:abc123|secret]] B";
    let course_id = create_course(&app, user_id, "Math", content).await;

    // The editor extracts markers from the saved content, then syncs them.
    let holes = extract_holes(content);
    assert_eq!(holes.len(), 1);
    assert_eq!(holes[0].id, "abc123");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/courses/{course_id}/sync-holes"),
        Some(json!({ "holes": holes })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["synced"], 1);

    // Never-reviewed holes read as 0 points.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/courses/{course_id}/holes?userId={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["text"], "secret");
    assert_eq!(body[0]["points"], 0.0);

    let (status, body) = send(
        &app,
        "POST",
        "/holes/abc123/review",
        Some(json!({ "userId": user_id, "rating": "oui" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["holeId"], "abc123");
    assert_eq!(body["points"], 1.0);

    let (status, body) = send(
        &app,
        "POST",
        "/holes/abc123/review",
        Some(json!({ "userId": user_id, "rating": "non" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 0.0);
}

#[tokio::test]
async fn sync_reports_same_count_both_times() {
    let (app, _dir) = test_app().await;
    let user_id = create_user(&app, "margaux").await;
    let course_id = create_course(&app, user_id, "Math", "").await;

    let payload = json!({ "holes": [
        { "id": "abc123", "text": "un" },
        { "id": "ffffff", "text": "deux" },
    ]});

    for _ in 0..2 {
        let (status, body) = send(
            &app,
            "POST",
            &format!("/courses/{course_id}/sync-holes"),
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["synced"], 2);
    }
}

#[tokio::test]
async fn sync_rejects_missing_course_and_malformed_payload() {
    let (app, _dir) = test_app().await;
    let user_id = create_user(&app, "margaux").await;
    let course_id = create_course(&app, user_id, "Math", "").await;

    let (status, _) = send(
        &app,
        "POST",
        "/courses/999/sync-holes",
        Some(json!({ "holes": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/courses/{course_id}/sync-holes"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "holes doit être un tableau.");

    // An entry with the wrong shape fails body deserialization as a 400.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/courses/{course_id}/sync-holes"),
        Some(json!({ "holes": [{ "id": 12 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_rating_is_rejected_before_scoring() {
    let (app, _dir) = test_app().await;
    let user_id = create_user(&app, "margaux").await;
    let course_id = create_course(&app, user_id, "Math", "").await;
    send(
        &app,
        "POST",
        &format!("/courses/{course_id}/sync-holes"),
        Some(json!({ "holes": [{ "id": "abc123", "text": "x" }] })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/holes/abc123/review",
        Some(json!({ "userId": user_id, "rating": "bof" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "rating invalide.");

    // The rejected review must not have materialized a state row.
    let (_, body) = send(
        &app,
        "GET",
        &format!("/courses/{course_id}/holes?userId={user_id}"),
        None,
    )
    .await;
    assert_eq!(body[0]["points"], 0.0);
}

#[tokio::test]
async fn iteration_advance_decays_and_floors() {
    let (app, _dir) = test_app().await;
    let user_id = create_user(&app, "margaux").await;
    let course_id = create_course(&app, user_id, "Math", "").await;
    send(
        &app,
        "POST",
        &format!("/courses/{course_id}/sync-holes"),
        Some(json!({ "holes": [
            { "id": "abc123", "text": "un" },
            { "id": "ffffff", "text": "deux" },
        ]})),
    )
    .await;

    // Bring the two holes to points {2, 0.5}.
    for _ in 0..2 {
        send(
            &app,
            "POST",
            "/holes/abc123/review",
            Some(json!({ "userId": user_id, "rating": "oui" })),
        )
        .await;
    }
    send(
        &app,
        "POST",
        "/holes/ffffff/review",
        Some(json!({ "userId": user_id, "rating": "plutot_oui" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/iterations/advance",
        Some(json!({ "userId": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/courses/{course_id}/holes?userId={user_id}"),
        None,
    )
    .await;
    assert_eq!(body[0]["points"], 1.0);
    assert_eq!(body[1]["points"], 0.0);
}

#[tokio::test]
async fn iteration_advance_requires_user_id() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(&app, "POST", "/iterations/advance", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId est requis.");
}

#[tokio::test]
async fn health_check_reports_ok() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
