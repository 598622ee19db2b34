use axum::http::StatusCode;
use http_body_util::BodyExt;
use specboard_core::config::Config;
use specboard_core::recent::MemoryStore;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A two-feature spec-kit project inside `dir`.
fn init_project(dir: &TempDir) {
    write(
        dir.path(),
        "specs/001-login/spec.md",
        "# Feature Specification: Login\n\n### US1 - Login (P1)\n- form renders\n",
    );
    write(
        dir.path(),
        "specs/001-login/tasks.md",
        "## Phase 1: Setup\n- [x] T001 [US1] Scaffold\n- [ ] T002 [US1] Form (src/login.rs)\n",
    );
    write(
        dir.path(),
        "specs/001-login/checklists/requirements.md",
        "# Requirements\n- [ ] No ambiguity\n- [x] Testable\n",
    );
    write(dir.path(), "specs/002-search/spec.md", "# Search\n");
}

/// Router whose allow-list covers the temp directory.
fn app(dir: &TempDir) -> axum::Router {
    let config = Config {
        allowed_roots: vec![dir.path().to_path_buf()],
        ..Config::default()
    };
    specboard_server::build_router(config, Box::new(MemoryStore::default()))
}

fn query(dir: &Path) -> String {
    dir.display().to_string().replace(' ', "%20")
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// Project and metrics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_returns_camel_case_snapshot() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = get(app(&dir), &format!("/api/project?path={}", query(dir.path()))).await;
    assert_eq!(status, StatusCode::OK);
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["id"], "001-login");
    assert_eq!(features[0]["name"], "Login");
    assert_eq!(features[0]["stage"], "implement");
    assert_eq!(features[0]["completedTasks"], 1);
    assert_eq!(features[0]["userStories"][0]["priority"], "P1");
    assert_eq!(features[0]["tasks"][1]["filePath"], "src/login.rs");
    assert_eq!(features[0]["grouping"]["kind"], "groups");
    assert_eq!(features[1]["stage"], "specify");
    assert_eq!(json["hasConstitution"], false);
    assert_eq!(json.get("constitution"), Some(&serde_json::Value::Null));
}

#[tokio::test]
async fn project_outside_allowed_roots_is_403() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(app(&dir), "/api/project?path=/etc").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(json["error"].as_str().unwrap().contains("outside allowed"));
}

#[tokio::test]
async fn non_project_directory_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, _) = get(app(&dir), &format!("/api/project?path={}", query(dir.path()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_path_parameter_is_400() {
    let dir = TempDir::new().unwrap();
    let (status, _) = get(app(&dir), "/api/project").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn feature_lookup() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let q = query(dir.path());

    let (status, json) = get(app(&dir), &format!("/api/project/features/002-search?path={q}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Search");

    let (status, _) = get(app(&dir), &format!("/api/project/features/999-nope?path={q}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_roll_up() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = get(app(&dir), &format!("/api/metrics?path={}", query(dir.path()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalFeatures"], 2);
    assert_eq!(json["totalTasks"], 2);
    assert_eq!(json["completionPercentage"], 50);
    assert_eq!(json["featuresByStage"]["implement"], 1);
    assert_eq!(json["featuresByStage"]["complete"], 0);
    assert_eq!(json["tasksByPhase"][0]["phase"], "Phase 1: Setup");
    assert_eq!(json["totalChecklistItems"], 2);
}

// ---------------------------------------------------------------------------
// Checklist toggle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn toggle_flips_checkbox_on_disk() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let file = dir.path().join("specs/001-login/checklists/requirements.md");

    let (status, json) = post_json(
        app(&dir),
        "/api/checklist/toggle",
        serde_json::json!({ "filePath": file.display().to_string(), "lineIndex": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["newState"], true);
    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        "# Requirements\n- [x] No ambiguity\n- [x] Testable\n"
    );
}

#[tokio::test]
async fn toggle_rejections_are_400_and_leave_file_alone() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let file = dir.path().join("specs/001-login/checklists/requirements.md");
    let before = std::fs::read_to_string(&file).unwrap();

    let (status, json) = post_json(
        app(&dir),
        "/api/checklist/toggle",
        serde_json::json!({ "filePath": file.display().to_string(), "lineIndex": 99 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("out of bounds"));

    let (status, json) = post_json(
        app(&dir),
        "/api/checklist/toggle",
        serde_json::json!({ "filePath": file.display().to_string(), "lineIndex": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("not a valid checkbox"));

    assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
}

#[tokio::test]
async fn toggle_refuses_non_markdown() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "notes.txt", "- [ ] item\n");
    let (status, _) = post_json(
        app(&dir),
        "/api/checklist/toggle",
        serde_json::json!({
            "filePath": dir.path().join("notes.txt").display().to_string(),
            "lineIndex": 0
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Recent projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recent_projects_round_trip() {
    let dir = TempDir::new().unwrap();
    let router = app(&dir);
    let first = dir.path().join("a").display().to_string();
    let second = dir.path().join("b").display().to_string();

    post_json(router.clone(), "/api/recent", serde_json::json!({ "path": first })).await;
    let (status, json) =
        post_json(router.clone(), "/api/recent", serde_json::json!({ "path": second })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([second, first]));

    let (_, json) = get(router, "/api/recent").await;
    assert_eq!(json, serde_json::json!([second, first]));
}

// ---------------------------------------------------------------------------
// Watch (SSE)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn watch_streams_initial_snapshot() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let req = axum::http::Request::builder()
        .uri(format!("/api/watch?path={}", query(dir.path())))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app(&dir).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ct = response.headers()[axum::http::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_string();
    assert!(ct.starts_with("text/event-stream"));

    let mut body = response.into_body();
    let frame = tokio::time::timeout(Duration::from_secs(5), body.frame())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    let payload = text.trim().strip_prefix("data: ").unwrap();
    let event: serde_json::Value = serde_json::from_str(payload).unwrap();
    assert_eq!(event["type"], "update");
    assert_eq!(event["data"]["features"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn watch_non_project_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, _) = get(app(&dir), &format!("/api/watch?path={}", query(dir.path()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
