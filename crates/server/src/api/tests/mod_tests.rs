use super::*;
use rand::{rngs::StdRng, SeedableRng};
use shared::{domain::UserId, error::ErrorCode};

fn ctx() -> ApiContext {
    ApiContext::seeded()
}

#[tokio::test]
async fn create_task_assigns_next_id_and_defaults_priority() {
    let ctx = ctx();
    let task = create_task(&ctx, Some("  Write docs "), None)
        .await
        .expect("task");
    assert_eq!(task.id, TaskId(4));
    assert_eq!(task.title, "Write docs");
    assert_eq!(task.priority, Priority::Medium);

    let task = create_task(&ctx, Some("Ship it"), Some("high"))
        .await
        .expect("task");
    assert_eq!(task.id, TaskId(5));
    assert_eq!(task.priority, Priority::High);
}

#[tokio::test]
async fn create_task_requires_title() {
    let ctx = ctx();
    for title in [None, Some(""), Some("   ")] {
        let err = create_task(&ctx, title, Some("low"))
            .await
            .expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, TITLE_REQUIRED);
    }
    assert_eq!(ctx.tasks.lock().await.len(), 3);
}

#[tokio::test]
async fn toggle_and_get_unknown_task_are_not_found() {
    let ctx = ctx();
    let err = toggle_task(&ctx, TaskId(99)).await.expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, TASK_NOT_FOUND);

    let err = get_task(&ctx, TaskId(99)).await.expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn toggled_tasks_move_between_filters() {
    let ctx = ctx();
    toggle_task(&ctx, TaskId(2)).await.expect("toggle");

    let completed = list_tasks(&ctx, StatusFilter::Completed, None).await;
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, TaskId(2));

    let active = list_tasks(&ctx, StatusFilter::Active, None).await;
    let ids: Vec<_> = active.iter().map(|t| t.id.0).collect();
    assert_eq!(ids, vec![1, 3]);

    let all = list_tasks(&ctx, StatusFilter::All, Some("  ")).await;
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn list_tasks_searches_titles() {
    let ctx = ctx();
    let hits = list_tasks(&ctx, StatusFilter::All, Some("htmx")).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Learn HTMX");
}

#[tokio::test]
async fn update_reports_unknown_id_before_missing_title() {
    let ctx = ctx();
    let err = update_task(&ctx, TaskId(42), None, None)
        .await
        .expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = update_task(&ctx, TaskId(1), Some(""), Some("low"))
        .await
        .expect_err("invalid");
    assert_eq!(err.code, ErrorCode::Validation);

    let task = update_task(&ctx, TaskId(1), Some("Teach HTMX"), Some(""))
        .await
        .expect("update");
    assert_eq!(task.title, "Teach HTMX");
    assert_eq!(task.priority, Priority::High);
}

#[tokio::test]
async fn delete_removes_one_task_and_ignores_unknown_ids() {
    let ctx = ctx();
    assert!(delete_task(&ctx, TaskId(2)).await);
    assert!(!delete_task(&ctx, TaskId(2)).await);
    let ids: Vec<_> = ctx.tasks.lock().await.list().iter().map(|t| t.id.0).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn search_users_matches_name_or_email() {
    let ctx = ApiContext::new(
        TaskStore::default(),
        UserDirectory::new(vec![
            User::new(1, "Alice", "alice@example.com"),
            User::new(2, "Bob", "bob@example.com"),
        ]),
    );
    let hits = search_users(&ctx, "ALI");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, UserId(1));
    assert!(search_users(&ctx, "zed").is_empty());
}

#[test]
fn users_page_reports_next_offset() {
    let ctx = ctx();
    let page = users_page(&ctx, 40, 10);
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.next_offset, None);

    let page = users_page(&ctx, 0, 10);
    assert_eq!(page.next_offset, Some(10));
}

#[test]
fn email_validation_messages() {
    assert_eq!(
        validate_email("").expect_err("empty").message,
        "Email is required"
    );
    for bad in ["plainaddress", "user@localhost", "a.b@c"] {
        assert_eq!(
            validate_email(bad).expect_err(bad).message,
            "Please enter a valid email address"
        );
    }
    validate_email("someone@example.com").expect("valid");
    validate_email("odd@name@example.org").expect("last @ decides");
}

#[test]
fn username_validation_messages() {
    assert_eq!(
        validate_username(" ").expect_err("empty").message,
        "Username is required"
    );
    assert_eq!(
        validate_username("ab").expect_err("short").message,
        "Username must be at least 3 characters"
    );
    for taken in ["admin", "User", "TEST"] {
        assert_eq!(
            validate_username(taken).expect_err(taken).message,
            "Username is already taken"
        );
    }
    validate_username("carol").expect("available");
}

#[test]
fn server_status_stays_within_ranges() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let status = server_status(&mut rng);
        assert!((10..=90).contains(&status.cpu));
        assert!((30..=85).contains(&status.memory));
        assert!((40..=70).contains(&status.disk));
        assert_eq!(status.timestamp.len(), 8);
    }
}

#[test]
fn notifications_arrive_about_half_the_time() {
    let mut rng = StdRng::seed_from_u64(42);
    let polls: Vec<_> = (0..200).map(|_| poll_notification(&mut rng)).collect();
    let delivered = polls.iter().flatten().count();
    assert!(delivered > 50 && delivered < 150, "delivered {delivered}");
    for notification in polls.iter().flatten() {
        assert!(NOTIFICATIONS
            .iter()
            .any(|(kind, message)| *kind == notification.kind && *message == notification.message));
    }
}

#[test]
fn modal_content_by_kind() {
    assert_eq!(modal_content("info").title, "Information");
    assert_eq!(modal_content("form").body, ModalBody::NameForm);
    let other = modal_content("pricing");
    assert_eq!(other.title, "Details");
    assert_eq!(other.body, ModalBody::Text("Content for pricing".into()));
}
