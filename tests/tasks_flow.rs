mod common;

use serde_json::json;

use common::{class_json, context};
use rust_classroom_console::client::{Method, RequestBody};
use rust_classroom_console::controllers::{ActionOutcome, ResourceListController};
use rust_classroom_console::models::tasks::TaskPriority;
use rust_classroom_console::resources::TaskResource;
use rust_classroom_console::resources::tasks::ATTACHMENT_FIELD;

fn task_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "Đọc chương 3",
        "due_date": "2026-11-01",
        "priority": "medium",
        "class_id": 1,
        "assigned_by": 42
    })
}

fn seeded() -> (common::TestContext, ResourceListController<TaskResource>) {
    let ctx = context();
    ctx.login("giangvien");
    ctx.transport
        .json(
            Method::Get,
            "/classes",
            200,
            json!([class_json(1, "CNTT-K66", "Công nghệ thông tin 1")]),
        )
        .json(Method::Get, "/tasks", 200, json!([task_json(3, "Bài tập tuần 4")]))
        .json(Method::Post, "/tasks", 201, json!({ "id": 4 }));
    let controller = ResourceListController::new(
        TaskResource::new(),
        ctx.client.clone(),
        ctx.session.clone(),
        &ctx.config,
    );
    (ctx, controller)
}

async fn fill(controller: &ResourceListController<TaskResource>) {
    controller.begin_create().await;
    controller.set_field("title", "Bài tập tuần 5").await;
    controller.set_field("due_date", "2026-11-08").await;
    controller.set_field("priority", "High").await;
    controller.set_field("class_id", "1").await;
}

#[tokio::test]
async fn test_task_without_file_is_json() {
    let (ctx, controller) = seeded();
    controller.mount().await;
    fill(&controller).await;

    assert_eq!(controller.submit().await, ActionOutcome::Done);
    let posts = ctx.transport.calls_to(Method::Post, "/tasks");
    let RequestBody::Json(body) = &posts[0].body else {
        panic!("expected JSON body");
    };
    assert_eq!(body["title"], "Bài tập tuần 5");
    assert_eq!(body["priority"], "high");
    assert_eq!(body["assigned_by"], 42);
}

#[tokio::test]
async fn test_task_with_file_is_multipart() {
    let (ctx, controller) = seeded();
    controller.mount().await;
    fill(&controller).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("de_bai.pdf");
    std::fs::write(&path, b"%PDF-1.4 noi dung de bai").unwrap();
    assert_eq!(controller.attach_path(&path).await, ActionOutcome::Done);

    assert_eq!(controller.submit().await, ActionOutcome::Done);
    let posts = ctx.transport.calls_to(Method::Post, "/tasks");
    assert!(posts[0].body.is_multipart());
    let RequestBody::Multipart(form) = &posts[0].body else {
        unreachable!();
    };
    assert_eq!(form.text("title"), Some("Bài tập tuần 5"));
    assert_eq!(form.text("priority"), Some("high"));
    let part = form.file(ATTACHMENT_FIELD).expect("attachment part");
    assert_eq!(part.file_name, "de_bai.pdf");
    assert_eq!(part.content_type, "application/pdf");
}

#[tokio::test]
async fn test_detached_file_is_not_sent() {
    let (ctx, controller) = seeded();
    controller.mount().await;
    fill(&controller).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ghi_chu.txt");
    std::fs::write(&path, "Hạn nộp thứ Sáu").unwrap();
    controller.attach_path(&path).await;
    controller.detach_file().await;

    controller.submit().await;
    let posts = ctx.transport.calls_to(Method::Post, "/tasks");
    assert!(!posts[0].body.is_multipart());
}

#[tokio::test]
async fn test_disallowed_file_is_rejected() {
    let (ctx, controller) = seeded();
    controller.mount().await;
    fill(&controller).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("setup.exe");
    std::fs::write(&path, [0x4D, 0x5A, 0x90, 0x00]).unwrap();

    assert_eq!(controller.attach_path(&path).await, ActionOutcome::Invalid);
    let form = controller.view().await.form.unwrap();
    assert_eq!(form.error.unwrap().field.as_deref(), Some("attachment"));
    assert!(form.draft.attachment().is_none());
    assert!(ctx.transport.calls_to(Method::Post, "/tasks").is_empty());
}

#[tokio::test]
async fn test_unknown_priority_is_rejected() {
    let (ctx, controller) = seeded();
    controller.mount().await;
    fill(&controller).await;
    controller.set_field("priority", "urgent").await;

    assert_eq!(controller.submit().await, ActionOutcome::Invalid);
    let error = controller.view().await.form.unwrap().error.unwrap();
    assert_eq!(error.field.as_deref(), Some("priority"));
    assert!(ctx.transport.calls_to(Method::Post, "/tasks").is_empty());
}

#[tokio::test]
async fn test_fetch_one_task() {
    let (ctx, controller) = seeded();
    ctx.transport
        .json(Method::Get, "/tasks/3", 200, task_json(3, "Bài tập tuần 4"));

    let task = controller.fetch_one(3).await.expect("task detail");
    assert_eq!(task.title, "Bài tập tuần 4");
    assert_eq!(task.priority, TaskPriority::Medium);

    assert!(controller.fetch_one(9).await.is_none());
    assert_eq!(controller.view().await.error.as_deref(), Some("Not found"));
}
