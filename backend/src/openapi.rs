use taskboard_shared::{CreateTaskRequest, HealthStatus, Task, TaskStats, UpdateTaskRequest};
use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_tasks,
        handlers::task_stats,
        handlers::get_task,
        handlers::create_task,
        handlers::update_task,
        handlers::delete_task,
        handlers::health
    ),
    components(
        schemas(Task, CreateTaskRequest, UpdateTaskRequest, TaskStats, HealthStatus)
    ),
    tags(
        (name = "tasks", description = "Task management endpoints"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;
