use std::sync::Arc;

use chrono::Local;
use rand::{seq::IndexedRandom, Rng};
use shared::{
    domain::{NewTask, Priority, StatusFilter, Task, TaskId, TaskUpdate, User},
    error::ApiError,
};
use storage::{Page, TaskStore, UserDirectory};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const TASK_NOT_FOUND: &str = "Task not found";
pub const TITLE_REQUIRED: &str = "Task title is required";
pub const TAKEN_USERNAMES: [&str; 3] = ["admin", "user", "test"];
pub const MIN_USERNAME_LEN: usize = 3;

#[derive(Clone)]
pub struct ApiContext {
    pub tasks: Arc<Mutex<TaskStore>>,
    pub users: Arc<UserDirectory>,
}

impl ApiContext {
    pub fn new(tasks: TaskStore, users: UserDirectory) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(tasks)),
            users: Arc::new(users),
        }
    }

    pub fn seeded() -> Self {
        Self::new(TaskStore::seeded(), UserDirectory::seeded())
    }
}

pub async fn list_tasks(
    ctx: &ApiContext,
    status: StatusFilter,
    query: Option<&str>,
) -> Vec<Task> {
    let tasks = ctx.tasks.lock().await;
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => tasks.search(status, query),
        None => tasks.filter(status),
    }
}

pub async fn get_task(ctx: &ApiContext, task_id: TaskId) -> Result<Task, ApiError> {
    ctx.tasks
        .lock()
        .await
        .get(task_id)
        .cloned()
        .ok_or_else(|| not_found(task_id))
}

pub async fn create_task(
    ctx: &ApiContext,
    title: Option<&str>,
    priority: Option<&str>,
) -> Result<Task, ApiError> {
    let title = required_title(title)?;
    let priority = priority.map_or(Priority::Medium, Priority::parse_or_default);
    let task = ctx.tasks.lock().await.add(NewTask::new(title, priority));
    info!(task_id = %task.id, "task created");
    Ok(task)
}

pub async fn toggle_task(ctx: &ApiContext, task_id: TaskId) -> Result<Task, ApiError> {
    let task = ctx
        .tasks
        .lock()
        .await
        .toggle(task_id)
        .ok_or_else(|| not_found(task_id))?;
    info!(task_id = %task.id, completed = task.completed, "task toggled");
    Ok(task)
}

/// Unknown ids are reported before an empty title.
pub async fn update_task(
    ctx: &ApiContext,
    task_id: TaskId,
    title: Option<&str>,
    priority: Option<&str>,
) -> Result<Task, ApiError> {
    let mut tasks = ctx.tasks.lock().await;
    if tasks.get(task_id).is_none() {
        return Err(not_found(task_id));
    }
    let update = TaskUpdate {
        title: required_title(title)?,
        priority: priority
            .filter(|p| !p.trim().is_empty())
            .map(Priority::parse_or_default),
    };
    let task = tasks
        .update(task_id, update)
        .ok_or_else(|| not_found(task_id))?;
    info!(task_id = %task.id, "task updated");
    Ok(task)
}

/// Returns whether a task was removed; deleting an unknown id is a no-op.
pub async fn delete_task(ctx: &ApiContext, task_id: TaskId) -> bool {
    let removed = ctx.tasks.lock().await.remove(task_id);
    if removed {
        info!(%task_id, "task deleted");
    } else {
        debug!(%task_id, "delete ignored for unknown task");
    }
    removed
}

pub fn search_users(ctx: &ApiContext, query: &str) -> Vec<User> {
    ctx.users.search(query)
}

pub fn users_page(ctx: &ApiContext, offset: usize, limit: usize) -> Page<User> {
    ctx.users.page(offset, limit)
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    let valid = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));
    if !valid {
        return Err(ApiError::validation("Please enter a valid email address"));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ApiError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ApiError::validation(format!(
            "Username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    let lowered = username.to_lowercase();
    if TAKEN_USERNAMES.contains(&lowered.as_str()) {
        return Err(ApiError::validation("Username is already taken"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    pub cpu: u8,
    pub memory: u8,
    pub disk: u8,
    pub timestamp: String,
}

pub fn server_status<R: Rng>(rng: &mut R) -> ServerStatus {
    ServerStatus {
        cpu: rng.random_range(10..=90),
        memory: rng.random_range(30..=85),
        disk: rng.random_range(40..=70),
        timestamp: clock_time(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

pub const NOTIFICATIONS: [(NotificationKind, &str); 4] = [
    (NotificationKind::Info, "New user registered"),
    (NotificationKind::Success, "Backup completed successfully"),
    (NotificationKind::Warning, "High memory usage detected"),
    (NotificationKind::Error, "Failed login attempt"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: &'static str,
    pub timestamp: String,
}

/// Half of all polls produce a notification.
pub fn poll_notification<R: Rng>(rng: &mut R) -> Option<Notification> {
    if !rng.random_bool(0.5) {
        return None;
    }
    let (kind, message) = *NOTIFICATIONS.choose(rng)?;
    Some(Notification {
        kind,
        message,
        timestamp: clock_time(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalBody {
    Text(String),
    NameForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub body: ModalBody,
}

pub fn modal_content(kind: &str) -> ModalContent {
    match kind {
        "info" => ModalContent {
            title: "Information".into(),
            body: ModalBody::Text("This is a dynamically loaded modal using HTMX!".into()),
        },
        "form" => ModalContent {
            title: "Quick Form".into(),
            body: ModalBody::NameForm,
        },
        other => ModalContent {
            title: "Details".into(),
            body: ModalBody::Text(format!("Content for {other}")),
        },
    }
}

pub fn clock_time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

fn required_title(title: Option<&str>) -> Result<String, ApiError> {
    title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation(TITLE_REQUIRED))
}

fn not_found(task_id: TaskId) -> ApiError {
    debug!(%task_id, "task lookup missed");
    ApiError::not_found(TASK_NOT_FOUND)
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
