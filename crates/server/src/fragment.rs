//! HTML fragments returned to HTMX.
//!
//! Every handler picks exactly one [`Fragment`] variant for its result and
//! `render` maps each variant to markup. There is no template lookup by name.

use std::fmt::Write as _;

use axum::response::{Html, IntoResponse, Response};
use shared::{
    domain::{Priority, Task, User},
    protocol::StreamContent,
};
use storage::Page;

use crate::api::{ModalBody, ModalContent, Notification, ServerStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Error,
}

impl AlertLevel {
    fn class(self) -> &'static str {
        match self {
            AlertLevel::Success => "alert-success",
            AlertLevel::Error => "alert-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Alert { level: AlertLevel, message: String },
    TimeBadge(String),
    TaskList(Vec<Task>),
    TaskItem(Task),
    /// A freshly created item appended to the list; also clears the empty placeholder.
    TaskCreated(Task),
    TaskEdit(Task),
    TaskDeleteConfirm(Task),
    UserList { users: Vec<User>, query: String },
    UserRows { page: Page<User>, limit: usize },
    FieldValid(String),
    FieldInvalid(String),
    Registered { username: String, email: String },
    ServerStatus(ServerStatus),
    Notification(Notification),
    Modal(ModalContent),
    OutOfBand,
    SlowLoaded,
    StreamItem(StreamContent),
}

impl Fragment {
    pub fn success(message: impl Into<String>) -> Self {
        Fragment::Alert {
            level: AlertLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Fragment::Alert {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Fragment::Alert { level, message } => format!(
                r##"<div class="alert {}">{}</div>"##,
                level.class(),
                escape_html(message)
            ),
            Fragment::TimeBadge(time) => {
                format!(r##"<span class="badge badge-info">{}</span>"##, escape_html(time))
            }
            Fragment::TaskList(tasks) => render_task_list(tasks),
            Fragment::TaskItem(task) => render_task_item(task),
            Fragment::TaskCreated(task) => format!(
                r##"{}
<li id="{TASK_LIST_EMPTY}" hx-swap-oob="delete"></li>"##,
                render_task_item(task)
            ),
            Fragment::TaskEdit(task) => render_task_edit(task),
            Fragment::TaskDeleteConfirm(task) => render_delete_confirm(task),
            Fragment::UserList { users, query } => render_user_list(users, query),
            Fragment::UserRows { page, limit } => render_user_rows(page, *limit),
            Fragment::FieldValid(message) => format!(
                r##"<div class="success-message">&#10003; {}</div>"##,
                escape_html(message)
            ),
            Fragment::FieldInvalid(message) => format!(
                r##"<div class="error-message">{}</div>"##,
                escape_html(message)
            ),
            Fragment::Registered { username, email } => format!(
                r##"<div class="alert alert-success">
    <h3>Registration Successful!</h3>
    <p>Welcome, {}!</p>
    <p>We've sent a confirmation email to {}</p>
</div>"##,
                escape_html(username),
                escape_html(email)
            ),
            Fragment::ServerStatus(status) => render_server_status(status),
            Fragment::Notification(notification) => format!(
                r##"<div class="notification notification-{kind}" style="animation: slideIn 0.3s ease-out;">
    <strong>{label}:</strong> {message}
    <span class="notification-time">{time}</span>
</div>"##,
                kind = notification.kind.as_str(),
                label = notification.kind.as_str().to_uppercase(),
                message = escape_html(notification.message),
                time = escape_html(&notification.timestamp),
            ),
            Fragment::Modal(content) => render_modal(content),
            Fragment::OutOfBand => OUT_OF_BAND.to_string(),
            Fragment::SlowLoaded => SLOW_LOADED.to_string(),
            Fragment::StreamItem(item) => format!(
                r##"<div class="sse-item" style="animation: slideIn 0.3s ease-out;">
    <span class="badge badge-primary">#{count}</span>
    <strong>{message}</strong>
    <div class="progress">
        <div class="progress-bar" style="width: {value}%">{value}%</div>
    </div>
</div>"##,
                count = item.count,
                message = escape_html(&item.message),
                value = item.value.clamp(0, 100),
            ),
        }
    }
}

impl IntoResponse for Fragment {
    fn into_response(self) -> Response {
        Html(self.render()).into_response()
    }
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const TASK_LIST_EMPTY: &str = "task-list-empty";

fn render_task_list(tasks: &[Task]) -> String {
    let mut html = String::from(r##"<ul id="task-list" class="task-list">"##);
    if tasks.is_empty() {
        html.push_str(&format!(
            r##"<li id="{TASK_LIST_EMPTY}" class="empty-state">No tasks to show</li>"##
        ));
    }
    for task in tasks {
        html.push_str(&render_task_item(task));
    }
    html.push_str("</ul>");
    html
}

fn render_task_item(task: &Task) -> String {
    let id = task.id;
    let priority = task.priority.as_str();
    format!(
        r##"<li id="task-{id}" class="task-item priority-{priority}{done}">
    <input type="checkbox"{checked} hx-put="/api/tasks/{id}/toggle" hx-target="#task-{id}" hx-swap="outerHTML">
    <span class="task-title">{title}</span>
    <span class="badge badge-{priority}">{priority}</span>
    <button class="btn btn-sm" hx-get="/api/tasks/{id}/edit" hx-target="#task-{id}" hx-swap="outerHTML">Edit</button>
    <button class="btn btn-sm btn-danger" hx-get="/api/tasks/{id}/delete-confirm" hx-target="#task-{id}" hx-swap="outerHTML">Delete</button>
</li>"##,
        done = if task.completed { " completed" } else { "" },
        checked = if task.completed { " checked" } else { "" },
        title = escape_html(&task.title),
    )
}

fn render_task_edit(task: &Task) -> String {
    let id = task.id;
    let mut options = String::new();
    for priority in Priority::ALL {
        let selected = if priority == task.priority { " selected" } else { "" };
        let _ = write!(
            options,
            r##"<option value="{value}"{selected}>{value}</option>"##,
            value = priority.as_str()
        );
    }
    format!(
        r##"<li id="task-{id}" class="task-item task-editing">
    <form hx-put="/api/tasks/{id}" hx-target="#task-{id}" hx-swap="outerHTML">
        <input type="text" name="title" class="form-control" value="{title}" required>
        <select name="priority" class="form-control">{options}</select>
        <button type="submit" class="btn btn-sm btn-primary">Save</button>
        <button type="button" class="btn btn-sm" hx-get="/api/tasks/{id}" hx-target="#task-{id}" hx-swap="outerHTML">Cancel</button>
    </form>
</li>"##,
        title = escape_html(&task.title),
    )
}

fn render_delete_confirm(task: &Task) -> String {
    let id = task.id;
    format!(
        r##"<li id="task-{id}" class="task-item task-confirm">
    <span>Delete "{title}"?</span>
    <button class="btn btn-sm btn-danger" hx-delete="/api/tasks/{id}" hx-target="#task-{id}" hx-swap="outerHTML swap:300ms">Yes, delete</button>
    <button class="btn btn-sm" hx-get="/api/tasks/{id}" hx-target="#task-{id}" hx-swap="outerHTML">Cancel</button>
</li>"##,
        title = escape_html(&task.title),
    )
}

fn render_user_list(users: &[User], query: &str) -> String {
    if users.is_empty() {
        return format!(
            r##"<div class="empty-state">No users found matching "{}"</div>"##,
            escape_html(query)
        );
    }
    let mut html = if query.is_empty() {
        format!(r##"<div class="results-info">Showing all {} users</div>"##, users.len())
    } else {
        format!(
            r##"<div class="results-info">Found {} users matching "{}"</div>"##,
            users.len(),
            escape_html(query)
        )
    };
    html.push_str(r##"<ul class="user-list">"##);
    for user in users {
        let _ = write!(
            html,
            r##"<li class="user-item"><strong>{}</strong> <span class="user-email">{}</span></li>"##,
            escape_html(&user.name),
            escape_html(&user.email)
        );
    }
    html.push_str("</ul>");
    html
}

fn render_user_rows(page: &Page<User>, limit: usize) -> String {
    let mut html = String::new();
    for user in &page.items {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            user.id,
            escape_html(&user.name),
            escape_html(&user.email)
        );
    }
    match page.next_offset {
        Some(next) => {
            let _ = write!(
                html,
                r##"<tr class="scroll-sentinel" hx-get="/api/users/infinite?offset={next}&amp;limit={limit}" hx-trigger="revealed" hx-swap="outerHTML"><td colspan="3" class="loading">Loading more users...</td></tr>"##
            );
        }
        None => html.push_str(r##"<tr class="end-of-list"><td colspan="3">No more users</td></tr>"##),
    }
    html
}

fn render_server_status(status: &ServerStatus) -> String {
    let mut html = String::from(r##"<div class="status-grid">"##);
    for (label, value) in [
        ("CPU", status.cpu),
        ("Memory", status.memory),
        ("Disk", status.disk),
    ] {
        let level = match value {
            0..=59 => "ok",
            60..=79 => "warn",
            _ => "critical",
        };
        let _ = write!(
            html,
            r##"<div class="status-card">
    <div class="status-label">{label}</div>
    <div class="progress"><div class="progress-bar progress-{level}" style="width: {value}%">{value}%</div></div>
</div>"##
        );
    }
    let _ = write!(
        html,
        r##"</div><div class="status-time">Last updated: {}</div>"##,
        escape_html(&status.timestamp)
    );
    html
}

fn render_modal(content: &ModalContent) -> String {
    let body = match &content.body {
        ModalBody::Text(text) => format!("<p>{}</p>", escape_html(text)),
        ModalBody::NameForm => NAME_FORM.to_string(),
    };
    format!(
        r##"<div class="modal-header">
    <h2>{title}</h2>
    <button class="modal-close" onclick="closeModal()">&times;</button>
</div>
<div class="modal-body" id="modal-body">{body}</div>"##,
        title = escape_html(&content.title),
    )
}

const NAME_FORM: &str = r##"<form hx-post="/api/modal-submit" hx-target="#modal-body">
    <div class="form-group">
        <label>Your Name:</label>
        <input type="text" name="name" class="form-control" required>
    </div>
    <button type="submit" class="btn btn-primary">Submit</button>
</form>"##;

const OUT_OF_BAND: &str = r##"<div id="main-content" class="alert alert-success">
    Main content updated!
</div>
<div id="sidebar-content" hx-swap-oob="true" class="alert alert-info">
    Sidebar updated via OOB swap!
</div>
<div id="header-status" hx-swap-oob="true">
    <span class="badge badge-success">Connected</span>
</div>"##;

const SLOW_LOADED: &str = r##"<div class="card">
    <h3>Content Loaded!</h3>
    <p>This content took a while to load, but HTMX showed a nice loading indicator.</p>
</div>"##;

#[cfg(test)]
#[path = "tests/fragment_tests.rs"]
mod tests;
