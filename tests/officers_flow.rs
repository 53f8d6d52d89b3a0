mod common;

use chrono::NaiveDate;
use serde_json::json;

use common::{Reply, class_json, context};
use rust_classroom_console::client::{Method, RequestBody};
use rust_classroom_console::controllers::{ActionOutcome, ResourceListController};
use rust_classroom_console::resources::OfficerResource;
use rust_classroom_console::resources::officers::NOT_A_MEMBER;

fn officer(id: i64, user_id: i64, end: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "class_id": 1,
        "user_id": user_id,
        "role_title": "Lớp trưởng",
        "start_date": "2026-01-05",
        "end_date": end
    })
}

fn seeded() -> (common::TestContext, ResourceListController<OfficerResource>) {
    let ctx = context();
    ctx.login("admin");
    ctx.transport
        .json(
            Method::Get,
            "/classes",
            200,
            json!([
                class_json(1, "CNTT-K66", "Công nghệ thông tin 1"),
                class_json(2, "KTPM-K66", "Kỹ thuật phần mềm"),
            ]),
        )
        .json(
            Method::Get,
            "/class-officers",
            200,
            json!([
                officer(5, 11, Some("2026-10-17")),
                officer(6, 12, Some("2026-10-18")),
                officer(7, 13, None),
            ]),
        )
        .json(
            Method::Get,
            "/users",
            200,
            json!([
                { "id": 11, "full_name": "Lê Văn C", "email": "c@example.edu.vn" },
                { "id": 12, "full_name": "Phạm Thị D", "email": "d@example.edu.vn" },
                { "id": 13, "full_name": "Võ Minh E", "email": "e@example.edu.vn" },
            ]),
        )
        .json(
            Method::Get,
            "/classes/1/members",
            200,
            json!([
                { "user_id": 12, "full_name": "Phạm Thị D" },
                { "user_id": 13, "full_name": "Võ Minh E" },
            ]),
        )
        .json(
            Method::Get,
            "/classes/2/members",
            200,
            json!([{ "user_id": 21, "full_name": "Đỗ Văn G" }]),
        );

    let resource =
        OfficerResource::new().with_today(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    let controller = ResourceListController::new(
        resource,
        ctx.client.clone(),
        ctx.session.clone(),
        &ctx.config,
    );
    (ctx, controller)
}

#[tokio::test]
async fn test_expired_assignments_are_hidden_and_deleted() {
    let (ctx, controller) = seeded();
    ctx.transport
        .json(Method::Delete, "/class-officers/5", 200, json!({}));

    assert_eq!(controller.mount().await, ActionOutcome::Done);

    let records = controller.records().await;
    assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![6, 7]);
    assert_eq!(records[0].user_name.as_deref(), Some("Phạm Thị D"));
    // 后端没有返回班级名称，首次加载即由班级目录补全
    assert_eq!(records[0].class_name.as_deref(), Some("Công nghệ thông tin 1"));
    assert_eq!(ctx.transport.calls_to(Method::Get, "/classes").len(), 1);

    let report = controller
        .resource()
        .take_cleanup()
        .expect("cleanup scheduled")
        .await
        .unwrap();
    assert_eq!(report.deleted, vec![5]);
    assert!(report.is_clean());
    assert_eq!(ctx.transport.calls_to(Method::Delete, "/class-officers/5").len(), 1);
    assert!(ctx.transport.calls_to(Method::Delete, "/class-officers/6").is_empty());
}

#[tokio::test]
async fn test_failed_cleanup_is_reported() {
    let (ctx, controller) = seeded();
    ctx.transport.on(
        Method::Delete,
        "/class-officers/5",
        Reply::Json(500, json!({ "message": "Database unavailable" })),
    );

    controller.mount().await;
    assert_eq!(controller.records().await.len(), 2);

    let report = controller
        .resource()
        .take_cleanup()
        .expect("cleanup scheduled")
        .await
        .unwrap();
    assert!(report.deleted.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 5);
    assert_eq!(report.attempted(), 1);

    // 列表本身不受后台清理失败影响
    assert!(controller.view().await.error.is_none());
}

#[tokio::test]
async fn test_no_cleanup_without_expired_records() {
    let (ctx, controller) = seeded();
    ctx.transport.json(
        Method::Get,
        "/class-officers",
        200,
        json!([officer(7, 13, None)]),
    );
    // 第一次请求仍然消费种子数据
    controller.mount().await;
    let _ = controller.resource().take_cleanup().unwrap().await;

    controller.load().await;
    assert!(controller.resource().take_cleanup().is_none());
}

#[tokio::test]
async fn test_class_change_loads_roster_and_selects_first() {
    let (ctx, controller) = seeded();
    controller.mount().await;

    controller.begin_create().await;
    assert_eq!(controller.set_field("class_id", "1").await, ActionOutcome::Done);
    assert_eq!(ctx.transport.calls_to(Method::Get, "/classes/1/members").len(), 1);

    let view = controller.view().await;
    let options = &view.options["user_id"];
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].value, "12");
    assert_eq!(view.form.unwrap().draft.get("user_id"), "12");

    // 切换班级后清空并重新选择
    controller.set_field("class_id", "2").await;
    let view = controller.view().await;
    assert_eq!(view.options["user_id"][0].label, "Đỗ Văn G");
    assert_eq!(view.form.unwrap().draft.get("user_id"), "21");
}

#[tokio::test]
async fn test_non_member_is_rejected_without_request() {
    let (ctx, controller) = seeded();
    controller.mount().await;

    controller.begin_create().await;
    controller.set_field("class_id", "1").await;
    controller.set_field("user_id", "21").await;
    controller.set_field("role_title", "Lớp phó").await;
    controller.set_field("start_date", "2026-09-01").await;

    assert_eq!(controller.submit().await, ActionOutcome::Invalid);
    let error = controller.view().await.form.unwrap().error.unwrap();
    assert_eq!(error.field.as_deref(), Some("user_id"));
    assert_eq!(error.message, NOT_A_MEMBER);
    assert!(ctx.transport.calls_to(Method::Post, "/class-officers").is_empty());
}

#[tokio::test]
async fn test_member_assignment_is_posted() {
    let (ctx, controller) = seeded();
    controller.mount().await;
    ctx.transport
        .json(Method::Post, "/class-officers", 201, json!({ "id": 8 }));

    controller.begin_create().await;
    controller.set_field("class_id", "1").await;
    controller.set_field("user_id", "13").await;
    controller.set_field("role_title", "Bí thư").await;
    controller.set_field("start_date", "2026-09-01").await;
    controller.set_field("end_date", "2027-06-30").await;

    assert_eq!(controller.submit().await, ActionOutcome::Done);
    let posts = ctx.transport.calls_to(Method::Post, "/class-officers");
    assert_eq!(posts.len(), 1);
    let RequestBody::Json(body) = &posts[0].body else {
        panic!("expected JSON body");
    };
    assert_eq!(body["user_id"], 13);
    assert_eq!(body["class_id"], 1);
    assert_eq!(body["end_date"], "2027-06-30");
}

#[tokio::test]
async fn test_end_before_start_is_rejected() {
    let (ctx, controller) = seeded();
    controller.mount().await;

    controller.begin_create().await;
    controller.set_field("class_id", "1").await;
    controller.set_field("role_title", "Bí thư").await;
    controller.set_field("start_date", "2026-09-01").await;
    controller.set_field("end_date", "2026-08-01").await;

    assert_eq!(controller.submit().await, ActionOutcome::Invalid);
    let error = controller.view().await.form.unwrap().error.unwrap();
    assert_eq!(error.field.as_deref(), Some("end_date"));
    assert!(ctx.transport.calls_to(Method::Post, "/class-officers").is_empty());
}

#[tokio::test]
async fn test_edit_keeps_existing_assignee() {
    let (ctx, controller) = seeded();
    controller.mount().await;

    assert_eq!(controller.begin_edit(7).await, ActionOutcome::Done);
    assert_eq!(ctx.transport.calls_to(Method::Get, "/classes/1/members").len(), 1);
    let view = controller.view().await;
    assert_eq!(view.form.unwrap().draft.get("user_id"), "13");
    assert_eq!(view.options["user_id"].len(), 2);
}
