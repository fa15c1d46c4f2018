use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{sse::Sse, Html, IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use serde::Deserialize;
use shared::{
    domain::{StatusFilter, TaskId},
    error::{ApiError, ErrorCode},
    protocol::{StreamContent, TaskEvent},
};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod events;
mod fragment;
mod pages;

use api::ApiContext;
use app_state::AppState;
use config::load_settings;
use fragment::Fragment;

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct GreetQuery {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskListQuery {
    status: Option<String>,
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskForm {
    title: Option<String>,
    priority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
struct ScrollQuery {
    #[serde(default)]
    offset: usize,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmailForm {
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct UsernameForm {
    #[serde(default)]
    username: String,
}

#[derive(Debug, Deserialize)]
struct RegistrationForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct ModalForm {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SlowLoadQuery {
    duration: Option<u64>,
}

/// Error fragment with the status matching its [`ErrorCode`].
struct Rejection(ApiError);

impl From<ApiError> for Rejection {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (status_for(self.0.code), Fragment::error(self.0.message)).into_response()
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let addr = settings.bind_addr()?;
    let state = AppState::new(ApiContext::seeded(), settings);
    let app = build_router(Arc::new(state));

    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.settings.static_dir);
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(|| async { pages::index() }))
        .route("/basic", get(|| async { pages::basic() }))
        .route("/tasks", get(tasks_page))
        .route("/search", get(|| async { pages::search() }))
        .route("/forms", get(|| async { pages::forms() }))
        .route("/polling", get(|| async { pages::polling() }))
        .route("/modal", get(|| async { pages::modal() }))
        .route("/transitions", get(|| async { pages::transitions() }))
        .route("/sse", get(|| async { pages::sse() }))
        .route("/api/greet", get(greet))
        .route("/api/time", get(server_time))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/events", get(task_events))
        .route(
            "/api/tasks/:task_id",
            get(get_task)
                .put(update_task)
                .post(update_task)
                .delete(delete_task),
        )
        .route("/api/tasks/:task_id/toggle", put(toggle_task).post(toggle_task))
        .route("/api/tasks/:task_id/edit", get(edit_task_form))
        .route("/api/tasks/:task_id/delete-confirm", get(delete_task_confirm))
        .route("/api/search", get(search_users))
        .route("/api/users/infinite", get(infinite_users))
        .route("/api/validate-email", post(validate_email))
        .route("/api/validate-username", post(validate_username))
        .route("/api/submit-form", post(submit_form))
        .route("/api/server-status", get(server_status))
        .route("/api/notifications", get(notifications))
        .route("/api/modal-content/:kind", get(modal_content))
        .route("/api/modal-submit", post(modal_submit))
        .route("/api/oob-demo", post(|| async { Fragment::OutOfBand }))
        .route("/api/slow-load", get(slow_load))
        .route("/api/sse-stream", get(sse_stream))
        .route("/api/sse-content", post(sse_content))
        .nest_service("/static", static_files)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn greet(Query(q): Query<GreetQuery>) -> Fragment {
    let name = q
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("World");
    Fragment::success(format!("Hello, {name}!"))
}

async fn server_time() -> Fragment {
    Fragment::TimeBadge(api::clock_time())
}

async fn tasks_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let tasks = api::list_tasks(&state.api, StatusFilter::All, None).await;
    pages::tasks(&tasks)
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TaskListQuery>,
) -> Fragment {
    let status = q
        .status
        .as_deref()
        .map_or(StatusFilter::All, StatusFilter::parse_lenient);
    Fragment::TaskList(api::list_tasks(&state.api, status, q.q.as_deref()).await)
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TaskForm>,
) -> Result<Fragment, Rejection> {
    let task =
        api::create_task(&state.api, form.title.as_deref(), form.priority.as_deref()).await?;
    state.events.send(TaskEvent::Created { task: task.clone() });
    Ok(Fragment::TaskCreated(task))
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<i64>,
) -> Result<Fragment, Rejection> {
    let task = api::get_task(&state.api, TaskId(task_id)).await?;
    Ok(Fragment::TaskItem(task))
}

async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<i64>,
) -> Result<Fragment, Rejection> {
    let task = api::toggle_task(&state.api, TaskId(task_id)).await?;
    state.events.send(TaskEvent::Updated { task: task.clone() });
    Ok(Fragment::TaskItem(task))
}

async fn edit_task_form(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<i64>,
) -> Result<Fragment, Rejection> {
    let task = api::get_task(&state.api, TaskId(task_id)).await?;
    Ok(Fragment::TaskEdit(task))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<i64>,
    Form(form): Form<TaskForm>,
) -> Result<Fragment, Rejection> {
    let task = api::update_task(
        &state.api,
        TaskId(task_id),
        form.title.as_deref(),
        form.priority.as_deref(),
    )
    .await?;
    state.events.send(TaskEvent::Updated { task: task.clone() });
    Ok(Fragment::TaskItem(task))
}

/// Always 200 with an empty body so HTMX removes the row.
async fn delete_task(State(state): State<Arc<AppState>>, Path(task_id): Path<i64>) -> StatusCode {
    let task_id = TaskId(task_id);
    if api::delete_task(&state.api, task_id).await {
        state.events.send(TaskEvent::Deleted { task_id });
    }
    StatusCode::OK
}

async fn delete_task_confirm(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<i64>,
) -> Result<Fragment, Rejection> {
    let task = api::get_task(&state.api, TaskId(task_id)).await?;
    Ok(Fragment::TaskDeleteConfirm(task))
}

async fn task_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stream = state.events.sse_named("task");
    debug!(
        subscribers = state.events.subscriber_count(),
        "task event stream opened"
    );
    stream
}

async fn search_users(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> Fragment {
    tokio::time::sleep(state.settings.search_delay()).await;
    let query = q.q.trim().to_lowercase();
    let users = api::search_users(&state.api, &query);
    Fragment::UserList { users, query }
}

async fn infinite_users(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ScrollQuery>,
) -> Fragment {
    tokio::time::sleep(state.settings.scroll_delay()).await;
    let limit = state.settings.clamp_page_size(q.limit);
    let page = api::users_page(&state.api, q.offset, limit);
    Fragment::UserRows { page, limit }
}

async fn validate_email(Form(form): Form<EmailForm>) -> Response {
    field_feedback(api::validate_email(&form.email), "Email looks good!")
}

async fn validate_username(Form(form): Form<UsernameForm>) -> Response {
    field_feedback(api::validate_username(&form.username), "Username is available!")
}

fn field_feedback(result: Result<(), ApiError>, ok_message: &str) -> Response {
    match result {
        Ok(()) => Fragment::FieldValid(ok_message.to_string()).into_response(),
        Err(error) => (
            status_for(error.code),
            Fragment::FieldInvalid(error.message),
        )
            .into_response(),
    }
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegistrationForm>,
) -> Result<Fragment, Rejection> {
    api::validate_username(&form.username)?;
    api::validate_email(&form.email)?;
    tokio::time::sleep(state.settings.submit_delay()).await;
    info!(username = %form.username.trim(), "registration accepted");
    Ok(Fragment::Registered {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
    })
}

async fn server_status() -> Fragment {
    Fragment::ServerStatus(api::server_status(&mut rand::rng()))
}

async fn notifications() -> Response {
    match api::poll_notification(&mut rand::rng()) {
        Some(notification) => Fragment::Notification(notification).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn modal_content(Path(kind): Path<String>) -> Fragment {
    Fragment::Modal(api::modal_content(&kind))
}

async fn modal_submit(Form(form): Form<ModalForm>) -> Fragment {
    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Guest");
    Fragment::success(format!("Thank you, {name}!"))
}

async fn slow_load(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SlowLoadQuery>,
) -> Fragment {
    tokio::time::sleep(state.settings.clamp_slow_load(q.duration.unwrap_or(2))).await;
    Fragment::SlowLoaded
}

async fn sse_stream(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Sse::new(events::update_stream(
        state.settings.sse_updates,
        state.settings.sse_interval(),
    ))
}

async fn sse_content(Json(content): Json<StreamContent>) -> Fragment {
    Fragment::StreamItem(content)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
