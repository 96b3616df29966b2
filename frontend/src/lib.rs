use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use taskboard_shared::{Task, TaskId, UpdateTaskRequest};
use web_sys::console;

pub mod api;
pub mod state;

use state::{Action, BoardState};

#[derive(Debug, Clone)]
pub enum Msg {
    LoadData,
    CreateTask,
    ToggleTask(TaskId),
    DeleteTask(TaskId),
    Board(Action),
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    board: BoardState,
}

impl Model {
    fn apply(&mut self, action: Action) {
        self.board = std::mem::take(&mut self.board).reduce(action);
    }
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::LoadData })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::LoadData => {
                self.apply(Action::LoadStarted);
                Cmd::new(async {
                    let (tasks, stats) = futures::join!(api::fetch_tasks(), api::fetch_stats());
                    if let Err(e) = &tasks {
                        console::error_1(&format!("{}: {}", state::LOAD_FAILED, e).into());
                    }
                    if let Err(e) = &stats {
                        console::warn_1(&format!("Stats unavailable: {}", e).into());
                    }
                    Msg::Board(state::initial_load(tasks, stats))
                })
            }
            Msg::CreateTask => {
                if !self.board.can_submit() {
                    return Cmd::none();
                }
                let request = self.board.draft.clone();
                self.apply(Action::CreateStarted);

                Cmd::new(async move {
                    match api::create_task(&request).await {
                        Ok(task) => Msg::Board(Action::Created(task)),
                        Err(e) => failed("Error creating task", e),
                    }
                })
            }
            Msg::ToggleTask(id) => {
                let Some(task) = self.board.task(id) else {
                    return Cmd::none();
                };
                let request = UpdateTaskRequest {
                    title: task.title.clone(),
                    description: task.description.clone(),
                    is_completed: !task.is_completed,
                };

                Cmd::new(async move {
                    match api::update_task(id, &request).await {
                        Ok(_) => Msg::Board(Action::CompletionSet {
                            id,
                            is_completed: request.is_completed,
                        }),
                        Err(e) => failed("Error updating task", e),
                    }
                })
            }
            Msg::DeleteTask(id) => {
                if self.board.task(id).is_none() {
                    return Cmd::none();
                }

                Cmd::new(async move {
                    match api::delete_task(id).await {
                        Ok(()) => Msg::Board(Action::Deleted(id)),
                        Err(e) => failed("Error deleting task", e),
                    }
                })
            }
            Msg::Board(action) => {
                self.apply(action);
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        if self.board.loading && self.board.tasks.is_empty() {
            return div([class("max-w-4xl mx-auto p-6")], [
                div([class("flex justify-center items-center h-64")], [
                    div([class("animate-spin rounded-full h-12 w-12 border-b-2 border-blue-500")], []),
                ]),
            ]);
        }

        div(
            [class("max-w-4xl mx-auto p-6")],
            [
                div([class("mb-8")], [
                    h1([class("text-4xl font-bold text-gray-800 mb-2")], [text("Task Manager")]),
                    p([class("text-gray-600")], [text("Axum + SQLite + Sauron")]),
                ]),
                self.view_stats(),
                self.view_error(),
                self.view_create_form(),
                self.view_task_list(),
            ],
        )
    }
}

impl Model {
    fn view_stats(&self) -> Node<Msg> {
        let stats = self.board.stats;
        div([class("grid grid-cols-1 md:grid-cols-3 gap-4 mb-8")], [
            stat_card("Total Tasks", stats.total, "bg-blue-100", "text-blue-800", "text-blue-900"),
            stat_card("Completed", stats.completed, "bg-green-100", "text-green-800", "text-green-900"),
            stat_card("Pending", stats.pending, "bg-yellow-100", "text-yellow-800", "text-yellow-900"),
        ])
    }

    fn view_error(&self) -> Node<Msg> {
        match &self.board.error {
            Some(message) => div(
                [class("bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded mb-4")],
                [
                    text(message),
                    button([
                        on_click(|_| Msg::Board(Action::ErrorDismissed)),
                        class("float-right font-bold"),
                    ], [text("×")]),
                ],
            ),
            None => span([], []),
        }
    }

    fn view_create_form(&self) -> Node<Msg> {
        div([class("bg-white p-6 rounded-lg shadow-md mb-8")], [
            h2([class("text-xl font-semibold mb-4")], [text("Add New Task")]),
            div([class("space-y-4")], [
                div([], [
                    label([class("block text-sm font-medium text-gray-700 mb-1")], [text("Title *")]),
                    input([
                        r#type("text"),
                        placeholder("Enter task title"),
                        value(&self.board.draft.title),
                        on_input(|event| Msg::Board(Action::DraftTitleChanged(event.value()))),
                        class("w-full p-3 border border-gray-300 rounded-md focus:ring-2 focus:ring-blue-500 focus:border-transparent"),
                    ], []),
                ]),
                div([], [
                    label([class("block text-sm font-medium text-gray-700 mb-1")], [text("Description")]),
                    textarea([
                        placeholder("Enter task description (optional)"),
                        value(&self.board.draft.description),
                        on_input(|event| Msg::Board(Action::DraftDescriptionChanged(event.value()))),
                        class("w-full p-3 border border-gray-300 rounded-md focus:ring-2 focus:ring-blue-500 focus:border-transparent h-20 resize-y"),
                    ], []),
                ]),
                button([
                    on_click(|_| Msg::CreateTask),
                    disabled(!self.board.can_submit()),
                    class("bg-blue-500 hover:bg-blue-600 text-white px-6 py-2 rounded-md disabled:opacity-50 disabled:cursor-not-allowed transition-colors"),
                ], [
                    if self.board.loading {
                        text("Adding...")
                    } else {
                        text("Add Task")
                    }
                ]),
            ]),
        ])
    }

    fn view_task_list(&self) -> Node<Msg> {
        let tasks = &self.board.tasks;
        div([class("space-y-4")], [
            h2([class("text-xl font-semibold")], [text(&format!("Tasks ({})", tasks.len()))]),
            if tasks.is_empty() {
                div([class("text-center py-12 text-gray-500")], [
                    p([], [text("No tasks yet. Create your first task above!")]),
                ])
            } else {
                div(
                    [class("space-y-4")],
                    tasks.iter().map(view_task).collect::<Vec<_>>(),
                )
            },
        ])
    }
}

fn stat_card(label_text: &str, count: i64, bg: &str, label_color: &str, value_color: &str) -> Node<Msg> {
    div([class(&format!("{} p-4 rounded-lg", bg))], [
        h3([class(&format!("text-sm font-medium {}", label_color))], [text(label_text)]),
        p([class(&format!("text-2xl font-bold {}", value_color))], [text(&count.to_string())]),
    ])
}

fn view_task(task: &Task) -> Node<Msg> {
    let task_id = task.id;
    let done = task.is_completed;

    div(
        [
            key(task_id.to_string()),
            class(&format!(
                "bg-white border rounded-lg p-4 shadow-sm transition-all {}",
                if done { "opacity-75 bg-gray-50" } else { "" }
            )),
        ],
        [div([class("flex items-start justify-between")], [
            div([class("flex-1")], [
                h3([class(&format!(
                    "font-semibold text-lg {}",
                    if done { "line-through text-gray-500" } else { "text-gray-800" }
                ))], [text(&task.title)]),
                if task.description.is_empty() {
                    span([], [])
                } else {
                    p([class(&format!(
                        "text-gray-600 mt-1 {}",
                        if done { "line-through" } else { "" }
                    ))], [text(&task.description)])
                },
                div([class("flex items-center gap-4 mt-2 text-sm text-gray-500")], [
                    span([], [text(&format!("Created: {}", task.created_at.format("%Y-%m-%d")))]),
                    span([class(&format!(
                        "px-2 py-1 rounded-full text-xs {}",
                        if done { "bg-green-100 text-green-800" } else { "bg-yellow-100 text-yellow-800" }
                    ))], [text(if done { "Completed" } else { "Pending" })]),
                ]),
            ]),
            div([class("flex gap-2 ml-4")], [
                button([
                    on_click(move |_| Msg::ToggleTask(task_id)),
                    class(&format!(
                        "px-4 py-2 rounded-md text-sm font-medium transition-colors text-white {}",
                        if done { "bg-yellow-500 hover:bg-yellow-600" } else { "bg-green-500 hover:bg-green-600" }
                    )),
                ], [text(if done { "Reopen" } else { "Complete" })]),
                button([
                    on_click(move |_| Msg::DeleteTask(task_id)),
                    class("bg-red-500 hover:bg-red-600 text-white px-4 py-2 rounded-md text-sm font-medium transition-colors"),
                ], [text("Delete")]),
            ]),
        ])],
    )
}

fn failed(message: &str, cause: String) -> Msg {
    console::error_1(&format!("{}: {}", message, cause).into());
    Msg::Board(Action::Failed(message.to_string()))
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::default());
}
