use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use rstest::rstest;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use taskboard_backend::{config::Config, create_app, db, AppState};
use tower::ServiceExt; // for `oneshot`

struct TestApp {
    router: Router,
    pool: SqlitePool,
}

async fn setup_app() -> TestApp {
    setup_app_in("test").await
}

async fn setup_app_in(environment: &str) -> TestApp {
    let config = Config::from_lookup(|name| match name {
        "APP_ENV" => Some(environment.to_string()),
        "ALLOWED_ORIGINS" => Some("http://localhost:5173".to_string()),
        _ => None,
    })
    .unwrap();

    // In-memory SQLite only survives on a single connection.
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create in-memory database");

    TestApp {
        router: create_app(AppState::new(pool.clone(), &config.environment), &config),
        pool,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(&self, title: &str) -> Value {
        let (status, body) = self
            .send(Method::POST, "/api/tasks", Some(json!({ "title": title })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn stats(&self) -> Value {
        let (status, body) = self.send(Method::GET, "/api/tasks/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

#[tokio::test]
async fn full_lifecycle_scenario() {
    let app = setup_app().await;

    let created = app.create("Buy milk").await;
    assert_eq!(created["id"], json!(1));
    assert_eq!(created["isCompleted"], json!(false));
    assert_eq!(created["description"], json!(""));

    assert_eq!(
        app.stats().await,
        json!({ "total": 1, "completed": 0, "pending": 1 })
    );

    let (status, updated) = app
        .send(
            Method::PUT,
            "/api/tasks/1",
            Some(json!({ "title": "Buy milk", "description": "", "isCompleted": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["isCompleted"], json!(true));

    assert_eq!(
        app.stats().await,
        json!({ "total": 1, "completed": 1, "pending": 0 })
    );

    let (status, body) = app.send(Method::DELETE, "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = app.send(Method::GET, "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_returns_location_and_server_owned_fields() {
    let app = setup_app().await;
    let before = Utc::now();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/tasks")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "title": "Write report",
                        "description": "quarterly",
                        "isCompleted": true,
                        "createdAt": "2000-01-01T00:00:00Z"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/api/tasks/1");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let task: taskboard_shared::Task = serde_json::from_slice(&bytes).unwrap();
    assert!(!task.is_completed);
    assert_eq!(task.description, "quarterly");
    assert!(task.created_at >= before);
}

#[tokio::test]
async fn ids_increase_and_are_never_reused() {
    let app = setup_app().await;

    let first = app.create("one").await["id"].as_i64().unwrap();
    let second = app.create("two").await["id"].as_i64().unwrap();
    assert!(second > first);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/tasks/{second}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let third = app.create("three").await["id"].as_i64().unwrap();
    assert!(third > second);
}

#[rstest]
#[case(json!({ "title": "" }))]
#[case(json!({ "title": "   " }))]
#[case(json!({ "description": "no title" }))]
#[tokio::test]
async fn create_rejects_blank_titles(#[case] body: Value) {
    let app = setup_app().await;

    let (status, error) = app.send(Method::POST, "/api/tasks", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], json!("Title is required"));

    assert_eq!(app.stats().await["total"], json!(0));
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let app = setup_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/tasks")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = setup_app().await;
    app.create("first").await;
    app.create("second").await;
    app.create("third").await;

    let (status, tasks) = app.send(Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn update_unknown_id_is_not_found_and_changes_nothing() {
    let app = setup_app().await;
    app.create("keep me").await;

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/tasks/42",
            Some(json!({ "title": "x", "description": "", "isCompleted": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 404 takes precedence over a blank title.
    let (status, _) = app
        .send(
            Method::PUT,
            "/api/tasks/42",
            Some(json!({ "title": "", "description": "", "isCompleted": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(
        app.stats().await,
        json!({ "total": 1, "completed": 0, "pending": 1 })
    );
}

#[tokio::test]
async fn update_rejects_blank_title_and_keeps_row() {
    let app = setup_app().await;
    app.create("original").await;

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/tasks/1",
            Some(json!({ "title": " ", "description": "", "isCompleted": true })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, task) = app.send(Method::GET, "/api/tasks/1", None).await;
    assert_eq!(task["title"], json!("original"));
    assert_eq!(task["isCompleted"], json!(false));
}

#[tokio::test]
async fn toggling_twice_restores_the_task() {
    let app = setup_app().await;
    let created = app.create("Water plants").await;
    let body = |done: bool| {
        json!({
            "title": created["title"],
            "description": created["description"],
            "isCompleted": done,
        })
    };

    let (_, once) = app.send(Method::PUT, "/api/tasks/1", Some(body(true))).await;
    assert_eq!(once["isCompleted"], json!(true));
    let (_, twice) = app.send(Method::PUT, "/api/tasks/1", Some(body(false))).await;

    assert_eq!(twice, created);
}

#[tokio::test]
async fn stats_track_every_mutation() {
    let app = setup_app().await;
    for title in ["a", "b", "c", "d"] {
        app.create(title).await;
    }
    for id in [1, 2] {
        app.send(
            Method::PUT,
            &format!("/api/tasks/{id}"),
            Some(json!({ "title": "done", "description": "", "isCompleted": true })),
        )
        .await;
    }
    app.send(Method::DELETE, "/api/tasks/1", None).await;
    app.send(Method::DELETE, "/api/tasks/3", None).await;

    let stats = app.stats().await;
    assert_eq!(stats, json!({ "total": 2, "completed": 1, "pending": 1 }));
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let app = setup_app().await;

    let (status, body) = app.send(Method::DELETE, "/api/tasks/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Task 7 not found"));
}

#[tokio::test]
async fn health_reports_environment() {
    let app = setup_app().await;

    let (status, body) = app.send(Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["environment"], json!("test"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn store_failure_surfaces_as_server_error() {
    let app = setup_app().await;
    app.pool.close().await;

    let (status, body) = app.send(Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Error retrieving tasks: "));

    // Health does not touch the store.
    let (status, _) = app.send(Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cors_allows_only_listed_origins() {
    let app = setup_app().await;

    let request = |origin: &'static str| {
        Request::builder()
            .method(Method::GET)
            .uri("/api/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app
        .router
        .clone()
        .oneshot(request("http://localhost:5173"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );

    let denied = app
        .router
        .clone()
        .oneshot(request("http://evil.example"))
        .await
        .unwrap();
    assert!(denied
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn openapi_document_is_served_in_development() {
    let app = setup_app_in("Development").await;

    let (status, doc) = app.send(Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);

    let paths = doc["paths"].as_object().unwrap();
    for path in ["/api/tasks", "/api/tasks/stats", "/api/tasks/{id}", "/api/health"] {
        assert!(paths.contains_key(path), "missing {path}");
    }
    assert!(doc["paths"]["/api/tasks/{id}"]["delete"].is_object());
    assert!(doc["components"]["schemas"]["Task"].is_object());
}

#[tokio::test]
async fn openapi_document_is_hidden_outside_development() {
    let app = setup_app_in("Production").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
