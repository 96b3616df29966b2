use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use taskboard_shared::{Task, TaskId, TaskStats};

#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: String,
    is_completed: bool,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            is_completed: row.is_completed,
            created_at: row.created_at,
        }
    }
}

/// Row store for tasks, keyed by integer id.
#[derive(Debug, Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<Task>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, is_completed, created_at \
             FROM tasks ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    pub async fn stats(&self) -> Result<TaskStats, sqlx::Error> {
        let (total, completed): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN is_completed THEN 1 ELSE 0 END), 0) FROM tasks",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(TaskStats::new(total, completed))
    }

    pub async fn find(&self, id: TaskId) -> Result<Option<Task>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, description, is_completed, created_at FROM tasks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Task::from))
    }

    /// Inserts an incomplete task stamped with the current time.
    pub async fn insert(&self, title: &str, description: &str) -> Result<Task, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (title, description, is_completed, created_at) \
             VALUES (?, ?, ?, ?) \
             RETURNING id, title, description, is_completed, created_at",
        )
        .bind(title)
        .bind(description)
        .bind(false)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replaces title, description and completion. `None` when the id is unknown.
    pub async fn update(
        &self,
        id: TaskId,
        title: &str,
        description: &str,
        is_completed: bool,
    ) -> Result<Option<Task>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks SET title = ?, description = ?, is_completed = ? \
             WHERE id = ? \
             RETURNING id, title, description, is_completed, created_at",
        )
        .bind(title)
        .bind(description)
        .bind(is_completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Task::from))
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: TaskId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
