use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod store;

use config::Config;
use store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    pub store: TaskStore,
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(pool: SqlitePool, environment: &str) -> Self {
        Self {
            store: TaskStore::new(pool),
            environment: Arc::from(environment),
        }
    }
}

/// Builds the HTTP surface: the task API, health, CORS and the static frontend.
/// Swagger UI is mounted only in development.
pub fn create_app(state: AppState, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let mut router = Router::new()
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/api/tasks/stats", get(handlers::task_stats))
        .route(
            "/api/tasks/:id",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/api/health", get(handlers::health));

    if config.is_development() {
        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        );
    }

    router
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
