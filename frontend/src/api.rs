use taskboard_shared::{CreateTaskRequest, Task, TaskId, TaskStats, UpdateTaskRequest};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Request, RequestInit, Response};

/// Origin of the API, fixed at build time. Empty means same origin.
const API_BASE_URL: &str = match option_env!("TASKBOARD_API_URL") {
    Some(url) => url,
    None => "",
};

pub async fn fetch_tasks() -> Result<Vec<Task>, String> {
    let text = send("GET", "/api/tasks", None).await?;
    if text.is_empty() {
        return Ok(Vec::new());
    }
    parse(&text)
}

pub async fn fetch_stats() -> Result<TaskStats, String> {
    let text = send("GET", "/api/tasks/stats", None).await?;
    parse(&text)
}

pub async fn create_task(request: &CreateTaskRequest) -> Result<Task, String> {
    let body = serde_json::to_string(request).map_err(|_| "Failed to serialize request")?;
    let text = send("POST", "/api/tasks", Some(body)).await?;
    parse(&text)
}

pub async fn update_task(id: TaskId, request: &UpdateTaskRequest) -> Result<Task, String> {
    let body = serde_json::to_string(request).map_err(|_| "Failed to serialize request")?;
    let text = send("PUT", &format!("/api/tasks/{}", id), Some(body)).await?;
    parse(&text)
}

pub async fn delete_task(id: TaskId) -> Result<(), String> {
    send("DELETE", &format!("/api/tasks/{}", id), None).await?;
    Ok(())
}

fn parse<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, String> {
    serde_json::from_str(text).map_err(|e| format!("Failed to parse JSON: {}", e))
}

/// Issues one request and returns the response body. Non-2xx statuses are errors.
async fn send(method: &str, path: &str, body: Option<String>) -> Result<String, String> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let url = format!("{}{}", API_BASE_URL, path);
    let request =
        Request::new_with_str_and_init(&url, &opts).map_err(|_| "Failed to create request")?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|_| "Failed to set header")?;

    let window = web_sys::window().ok_or("No window available")?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| "Failed to send request")?
        .into();

    if !response.ok() {
        let message = format!("{} {} failed with status {}", method, path, response.status());
        console::error_1(&message.clone().into());
        return Err(message);
    }

    let text_promise = response.text().map_err(|_| "Failed to read response")?;
    JsFuture::from(text_promise)
        .await
        .map_err(|_| "Failed to get text")?
        .as_string()
        .ok_or_else(|| "Failed to convert to string".to_string())
}
