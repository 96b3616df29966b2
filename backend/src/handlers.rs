use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use taskboard_shared::{
    validate_title, CreateTaskRequest, HealthStatus, Task, TaskId, TaskStats, UpdateTaskRequest,
};

use crate::{error::ApiError, AppState};

#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    responses(
        (status = 200, description = "All tasks, newest first", body = [Task]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .store
        .list()
        .await
        .map_err(ApiError::persistence("Error retrieving tasks"))?;

    Ok(Json(tasks))
}

#[utoipa::path(
    get,
    path = "/api/tasks/stats",
    tag = "tasks",
    responses(
        (status = 200, description = "Counts over all tasks", body = TaskStats),
        (status = 500, description = "Store failure")
    )
)]
pub async fn task_stats(State(state): State<AppState>) -> Result<Json<TaskStats>, ApiError> {
    let stats = state
        .store
        .stats()
        .await
        .map_err(ApiError::persistence("Error retrieving stats"))?;

    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = i64, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "The task", body = Task),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_task(
    Path(id): Path<TaskId>,
    State(state): State<AppState>,
) -> Result<Json<Task>, ApiError> {
    state
        .store
        .find(id)
        .await
        .map_err(ApiError::persistence("Error retrieving task"))?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Title is required"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let title = validate_title(&payload.title)?;

    let task = state
        .store
        .insert(title, &payload.description)
        .await
        .map_err(ApiError::persistence("Error creating task"))?;
    tracing::debug!(id = task.id, "task created");

    let location = format!("/api/tasks/{}", task.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(task)))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = i64, Path, description = "Task id")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Title is required"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn update_task(
    Path(id): Path<TaskId>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(payload) = payload?;

    // Unknown ids answer 404 even when the body is also invalid.
    state
        .store
        .find(id)
        .await
        .map_err(ApiError::persistence("Error updating task"))?
        .ok_or(ApiError::NotFound(id))?;

    let title = validate_title(&payload.title)?;

    let task = state
        .store
        .update(id, title, &payload.description, payload.is_completed)
        .await
        .map_err(ApiError::persistence("Error updating task"))?
        .ok_or(ApiError::NotFound(id))?;
    tracing::debug!(id, is_completed = task.is_completed, "task updated");

    Ok(Json(task))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = i64, Path, description = "Task id")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn delete_task(
    Path(id): Path<TaskId>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(ApiError::persistence("Error deleting task"))?;

    if deleted {
        tracing::debug!(id, "task deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        environment: state.environment.to_string(),
    })
}
