//! Client-side task board state.
//!
//! Every user event and server reply is expressed as an [`Action`] and folded
//! into a [`BoardState`] by [`BoardState::reduce`]. Counter adjustments are
//! local predictions; they are never reconciled against the server.

use taskboard_shared::{CreateTaskRequest, Task, TaskId, TaskStats};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub tasks: Vec<Task>,
    pub stats: TaskStats,
    pub draft: CreateTaskRequest,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadStarted,
    Loaded { tasks: Vec<Task>, stats: TaskStats },
    DraftTitleChanged(String),
    DraftDescriptionChanged(String),
    CreateStarted,
    Created(Task),
    /// The server accepted a new completion value for `id`.
    CompletionSet { id: TaskId, is_completed: bool },
    Deleted(TaskId),
    Failed(String),
    ErrorDismissed,
}

impl BoardState {
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::LoadStarted => {
                self.loading = true;
                self.error = None;
            }
            Action::Loaded { tasks, stats } => {
                self.tasks = tasks;
                self.stats = stats;
                self.loading = false;
            }
            Action::DraftTitleChanged(title) => self.draft.title = title,
            Action::DraftDescriptionChanged(description) => self.draft.description = description,
            Action::CreateStarted => self.loading = true,
            Action::Created(task) => {
                // Keep anything typed while the request was in flight.
                if self.draft.title == task.title && self.draft.description == task.description {
                    self.draft = CreateTaskRequest::default();
                }
                self.tasks.push(task);
                self.stats.total += 1;
                self.stats.pending += 1;
                self.loading = false;
            }
            Action::CompletionSet { id, is_completed } => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                    if task.is_completed != is_completed {
                        task.is_completed = is_completed;
                        let delta = if is_completed { 1 } else { -1 };
                        self.stats.completed += delta;
                        self.stats.pending -= delta;
                    }
                }
            }
            Action::Deleted(id) => {
                if let Some(index) = self.tasks.iter().position(|t| t.id == id) {
                    let removed = self.tasks.remove(index);
                    self.stats.total -= 1;
                    if removed.is_completed {
                        self.stats.completed -= 1;
                    } else {
                        self.stats.pending -= 1;
                    }
                }
            }
            Action::Failed(message) => {
                self.error = Some(message);
                self.loading = false;
            }
            Action::ErrorDismissed => self.error = None,
        }
        self
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && taskboard_shared::validate_title(&self.draft.title).is_ok()
    }
}

/// Folds the concurrent initial fetches into one action.
///
/// Missing stats fall back to zeroes; missing tasks fail the whole load.
pub fn initial_load(
    tasks: Result<Vec<Task>, String>,
    stats: Result<TaskStats, String>,
) -> Action {
    match tasks {
        Ok(tasks) => Action::Loaded {
            tasks,
            stats: stats.unwrap_or_default(),
        },
        Err(_) => Action::Failed(LOAD_FAILED.to_string()),
    }
}

pub const LOAD_FAILED: &str = "Error loading data from server";
