mod common;

use serde_json::json;
use std::time::Duration;

use common::{Reply, class_json, context};
use rust_classroom_console::client::Method;
use rust_classroom_console::controllers::{ActionOutcome, ResourceListController};
use rust_classroom_console::resources::ClassResource;

#[tokio::test]
async fn test_older_response_is_discarded() {
    let ctx = context();
    ctx.login("admin");
    ctx.transport
        .on(
            Method::Get,
            "/classes",
            Reply::Delayed(
                Duration::from_millis(200),
                Box::new(Reply::Json(200, json!([class_json(1, "CU-01", "Lớp cũ")]))),
            ),
        )
        .json(
            Method::Get,
            "/classes",
            200,
            json!([
                class_json(2, "MOI-01", "Lớp mới 1"),
                class_json(3, "MOI-02", "Lớp mới 2"),
            ]),
        );
    let controller = ResourceListController::new(
        ClassResource,
        ctx.client.clone(),
        ctx.session.clone(),
        &ctx.config,
    );

    let slow = controller.load();
    let fast = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        controller.load().await
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(slow, ActionOutcome::Superseded);
    assert_eq!(fast, ActionOutcome::Done);

    let view = controller.view().await;
    assert!(!view.loading);
    assert_eq!(
        view.records.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![2, 3]
    );
}

#[tokio::test]
async fn test_stale_failure_does_not_override() {
    let ctx = context();
    ctx.login("admin");
    ctx.transport
        .on(
            Method::Get,
            "/classes",
            Reply::Delayed(
                Duration::from_millis(200),
                Box::new(Reply::Fail("timed out".to_string())),
            ),
        )
        .json(
            Method::Get,
            "/classes",
            200,
            json!([class_json(2, "MOI-01", "Lớp mới 1")]),
        );
    let controller = ResourceListController::new(
        ClassResource,
        ctx.client.clone(),
        ctx.session.clone(),
        &ctx.config,
    );

    let (slow, fast) = tokio::join!(controller.load(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        controller.load().await
    });

    assert_eq!(slow, ActionOutcome::Superseded);
    assert_eq!(fast, ActionOutcome::Done);
    let view = controller.view().await;
    assert!(view.error.is_none());
    assert_eq!(view.records.len(), 1);
}
