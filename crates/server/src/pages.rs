//! Full-page documents. Each page is static markup wired to the `/api`
//! fragment routes through `hx-*` attributes; only the tasks page embeds
//! server state.

use axum::response::Html;
use shared::domain::{StatusFilter, Task};

use crate::fragment::Fragment;

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";
const HTMX_SSE_SRC: &str = "https://unpkg.com/htmx.org@1.9.12/dist/ext/sse.js";

/// Inputs holding the tasks page's current status filter and title query.
const TASK_FILTER_FIELDS: &str = "[name='status'],[name='q']";

const NAV: [(&str, &str); 9] = [
    ("/", "Home"),
    ("/basic", "Basics"),
    ("/tasks", "Tasks"),
    ("/search", "Search"),
    ("/forms", "Forms"),
    ("/polling", "Polling"),
    ("/modal", "Modals"),
    ("/transitions", "Transitions"),
    ("/sse", "SSE"),
];

fn layout(title: &str, active: &str, body: &str) -> Html<String> {
    let nav: String = NAV
        .iter()
        .map(|(href, label)| {
            let class = if *href == active { r#" class="active""# } else { "" };
            format!(r#"<a href="{href}"{class}>{label}</a>"#)
        })
        .collect();
    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} - HTMX Demo</title>
    <link rel="stylesheet" href="/static/css/style.css">
    <script src="{HTMX_SRC}"></script>
    <script src="{HTMX_SSE_SRC}"></script>
</head>
<body>
    <header class="site-header">
        <h1>HTMX Demo</h1>
        <nav>{nav}</nav>
        <div id="header-status"><span class="badge">Idle</span></div>
    </header>
    <main class="container">
{body}
    </main>
</body>
</html>"##
    ))
}

pub fn index() -> Html<String> {
    let cards: String = NAV[1..]
        .iter()
        .map(|(href, label)| {
            format!(r#"<a class="card feature-card" href="{href}"><h3>{label}</h3></a>"#)
        })
        .collect();
    layout(
        "Home",
        "/",
        &format!(
            r#"<section>
    <h2>Hypermedia-driven UI with Axum</h2>
    <p>Each page below demonstrates one HTMX technique backed by a small server route.</p>
    <div class="feature-grid">{cards}</div>
</section>"#
        ),
    )
}

pub fn basic() -> Html<String> {
    layout("Basics", "/basic", BASIC_BODY)
}

pub fn tasks(tasks: &[Task]) -> Html<String> {
    let filters: String = StatusFilter::ALL
        .iter()
        .map(|status| {
            format!(
                r##"<button class="btn btn-sm" hx-get="/api/tasks" hx-vals='{{"status": "{value}"}}' hx-include="[name='q']" hx-target="#task-list" hx-swap="outerHTML" hx-on::before-request="document.getElementById('task-status').value = '{value}'">{value}</button>"##,
                value = status.as_str()
            )
        })
        .collect();
    let list = Fragment::TaskList(tasks.to_vec()).render();
    layout(
        "Tasks",
        "/tasks",
        &format!(
            r##"<section>
    <h2>Task Manager</h2>
    <form hx-post="/api/tasks" hx-target="#task-list" hx-swap="beforeend" hx-on::after-request="if(event.detail.successful) this.reset()">
        <input type="text" name="title" class="form-control" placeholder="What needs doing?">
        <select name="priority" class="form-control">
            <option value="high">high</option>
            <option value="medium" selected>medium</option>
            <option value="low">low</option>
        </select>
        <button type="submit" class="btn btn-primary">Add Task</button>
    </form>
    <div class="filters">{filters}</div>
    <input type="hidden" id="task-status" name="status" value="all">
    <input type="search" name="q" class="form-control" placeholder="Filter by title..."
           hx-get="/api/tasks" hx-include="{TASK_FILTER_FIELDS}" hx-trigger="keyup changed delay:300ms" hx-target="#task-list" hx-swap="outerHTML">
    {list}
    <div hx-ext="sse" sse-connect="/api/tasks/events"
         hx-get="/api/tasks" hx-include="{TASK_FILTER_FIELDS}" hx-trigger="sse:task" hx-target="#task-list" hx-swap="outerHTML"></div>
</section>"##
        ),
    )
}

pub fn search() -> Html<String> {
    layout("Search", "/search", SEARCH_BODY)
}

pub fn forms() -> Html<String> {
    layout("Forms", "/forms", FORMS_BODY)
}

pub fn polling() -> Html<String> {
    layout("Polling", "/polling", POLLING_BODY)
}

pub fn modal() -> Html<String> {
    layout("Modals", "/modal", MODAL_BODY)
}

pub fn transitions() -> Html<String> {
    layout("Transitions", "/transitions", TRANSITIONS_BODY)
}

pub fn sse() -> Html<String> {
    layout("Server-Sent Events", "/sse", SSE_BODY)
}

const BASIC_BODY: &str = r##"<section>
    <h2>Basic Requests</h2>
    <div class="card">
        <h3>GET with parameters</h3>
        <input type="text" name="name" class="form-control" placeholder="Your name">
        <button class="btn btn-primary" hx-get="/api/greet" hx-include="[name='name']" hx-target="#greeting">Greet me</button>
        <div id="greeting"></div>
    </div>
    <div class="card">
        <h3>Server time</h3>
        <button class="btn" hx-get="/api/time" hx-target="#server-time">What time is it?</button>
        <span id="server-time"></span>
    </div>
</section>"##;

const SEARCH_BODY: &str = r##"<section>
    <h2>Live Search</h2>
    <input type="search" name="q" class="form-control" placeholder="Search users..."
           hx-get="/api/search" hx-trigger="input changed delay:500ms, search" hx-target="#search-results" hx-indicator="#search-indicator">
    <span id="search-indicator" class="htmx-indicator">Searching...</span>
    <div id="search-results"></div>
</section>
<section>
    <h2>Infinite Scroll</h2>
    <table class="table">
        <thead><tr><th>ID</th><th>Name</th><th>Email</th></tr></thead>
        <tbody>
            <tr hx-get="/api/users/infinite?offset=0" hx-trigger="load" hx-swap="outerHTML"><td colspan="3">Loading...</td></tr>
        </tbody>
    </table>
</section>"##;

const FORMS_BODY: &str = r##"<section>
    <h2>Registration</h2>
    <form hx-post="/api/submit-form" hx-target="#form-result" hx-indicator="#submit-indicator">
        <div class="form-group">
            <label>Username</label>
            <input type="text" name="username" class="form-control"
                   hx-post="/api/validate-username" hx-trigger="keyup changed delay:500ms" hx-target="#username-feedback">
            <div id="username-feedback"></div>
        </div>
        <div class="form-group">
            <label>Email</label>
            <input type="email" name="email" class="form-control"
                   hx-post="/api/validate-email" hx-trigger="blur" hx-target="#email-feedback">
            <div id="email-feedback"></div>
        </div>
        <button type="submit" class="btn btn-primary">Register</button>
        <span id="submit-indicator" class="htmx-indicator">Submitting...</span>
    </form>
    <div id="form-result"></div>
</section>"##;

const POLLING_BODY: &str = r##"<section>
    <h2>Server Status</h2>
    <div id="server-status" hx-get="/api/server-status" hx-trigger="load, every 2s"></div>
</section>
<section>
    <h2>Notifications</h2>
    <div id="notifications" hx-get="/api/notifications" hx-trigger="every 3s" hx-swap="afterbegin"></div>
</section>"##;

const MODAL_BODY: &str = r##"<section>
    <h2>Modal Dialogs</h2>
    <button class="btn" hx-get="/api/modal-content/info" hx-target="#modal-content" onclick="openModal()">Info modal</button>
    <button class="btn" hx-get="/api/modal-content/form" hx-target="#modal-content" onclick="openModal()">Form modal</button>
    <button class="btn" hx-get="/api/modal-content/custom" hx-target="#modal-content" onclick="openModal()">Custom modal</button>
    <div id="modal" class="modal hidden"><div id="modal-content" class="modal-content"></div></div>
</section>
<section>
    <h2>Out-of-Band Swaps</h2>
    <button class="btn btn-primary" hx-post="/api/oob-demo" hx-target="#main-content" hx-swap="outerHTML">Update three regions</button>
    <div id="main-content" class="alert">Main content</div>
    <div id="sidebar-content" class="alert">Sidebar</div>
</section>
<script>
    function openModal() { document.getElementById('modal').classList.remove('hidden'); }
    function closeModal() { document.getElementById('modal').classList.add('hidden'); }
</script>"##;

const TRANSITIONS_BODY: &str = r##"<section>
    <h2>Loading States</h2>
    <button class="btn btn-primary" hx-get="/api/slow-load?duration=2" hx-target="#slow-content" hx-indicator="#slow-indicator">Load slowly</button>
    <span id="slow-indicator" class="htmx-indicator spinner"></span>
    <div id="slow-content" class="fade-in"></div>
</section>"##;

const SSE_BODY: &str = r##"<section>
    <h2>Server-Sent Events</h2>
    <p>The server pushes ten updates, one per second.</p>
    <button class="btn btn-primary" onclick="startStream()">Start stream</button>
    <div id="sse-feed"></div>
</section>
<script>
    function startStream() {
        const source = new EventSource('/api/sse-stream');
        source.onmessage = async (event) => {
            const response = await fetch('/api/sse-content', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: event.data,
            });
            document.getElementById('sse-feed').insertAdjacentHTML('beforeend', await response.text());
        };
        source.onerror = () => source.close();
    }
</script>"##;

#[cfg(test)]
#[path = "tests/pages_tests.rs"]
mod tests;
