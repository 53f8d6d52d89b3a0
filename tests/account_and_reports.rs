mod common;

use serde_json::json;

use common::{Reply, context};
use rust_classroom_console::client::{Method, RequestBody};
use rust_classroom_console::models::auth::requests::UpdateProfileRequest;
use rust_classroom_console::models::reports::ExportFormat;
use rust_classroom_console::services::{AuthService, ReportService};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

#[tokio::test]
async fn test_profile_update_refreshes_session() {
    let ctx = context();
    ctx.login("admin");
    ctx.transport
        .json(Method::Put, "/auth/profile", 200, json!({}))
        .json(
            Method::Get,
            "/auth/profile",
            200,
            json!({ "id": 42, "full_name": "Nguyễn Thị Hoa (CNTT)", "email": "hoa@example.edu.vn", "role": "admin" }),
        );
    let auth = AuthService::new(ctx.client.clone(), ctx.session.clone(), &ctx.config);

    let update = UpdateProfileRequest {
        display_name: Some("Nguyễn Thị Hoa (CNTT)".to_string()),
        ..Default::default()
    };
    let user = auth.update_profile(update).await.unwrap();
    assert_eq!(user.display_name, "Nguyễn Thị Hoa (CNTT)");
    assert_eq!(
        ctx.session.current().map(|u| u.display_name).as_deref(),
        Some("Nguyễn Thị Hoa (CNTT)")
    );

    let puts = ctx.transport.calls_to(Method::Put, "/auth/profile");
    let RequestBody::Json(body) = &puts[0].body else {
        panic!("expected JSON body");
    };
    assert!(body.get("email").is_none());
}

#[tokio::test]
async fn test_profile_update_rejects_bad_phone() {
    let ctx = context();
    ctx.login("admin");
    let auth = AuthService::new(ctx.client.clone(), ctx.session.clone(), &ctx.config);

    let update = UpdateProfileRequest {
        phone: Some("abc".to_string()),
        ..Default::default()
    };
    assert!(auth.update_profile(update).await.is_err());
    assert_eq!(ctx.transport.count(), 0);
}

#[tokio::test]
async fn test_avatar_upload_is_multipart() {
    let ctx = context();
    ctx.login("admin");
    ctx.transport
        .json(Method::Post, "/auth/profile/avatar", 200, json!({}))
        .json(
            Method::Get,
            "/auth/profile",
            200,
            json!({ "id": 42, "full_name": "Nguyễn Thị Hoa", "avatar": "/uploads/42.png", "role": "admin" }),
        );
    let auth = AuthService::new(ctx.client.clone(), ctx.session.clone(), &ctx.config);

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("cv.pdf");
    std::fs::write(&pdf, b"%PDF-1.4").unwrap();
    assert!(auth.upload_avatar(&pdf).await.is_err());
    assert_eq!(ctx.transport.count(), 0);

    let png = dir.path().join("avatar.png");
    std::fs::write(&png, PNG).unwrap();
    let user = auth.upload_avatar(&png).await.unwrap();
    assert_eq!(user.avatar.as_deref(), Some("/uploads/42.png"));

    let posts = ctx.transport.calls_to(Method::Post, "/auth/profile/avatar");
    let RequestBody::Multipart(form) = &posts[0].body else {
        panic!("expected multipart body");
    };
    assert_eq!(form.file("avatar").unwrap().content_type, "image/png");
}

#[tokio::test]
async fn test_statistics_keep_extra_fields() {
    let ctx = context();
    ctx.login("admin");
    ctx.transport.json(
        Method::Get,
        "/reports/statistics",
        200,
        json!({ "total_classes": 12, "total_students": 480, "active_officers": 30 }),
    );
    let reports = ReportService::new(ctx.client.clone(), &ctx.config);

    let stats = reports.statistics().await.unwrap();
    assert_eq!(stats.total_classes, 12);
    assert_eq!(stats.total_tasks, 0);
    assert_eq!(stats.extra["active_officers"], 30);
}

#[tokio::test]
async fn test_export_saved_with_timestamped_name() {
    let ctx = context();
    ctx.login("admin");
    ctx.transport
        .on(
            Method::Get,
            "/reports/export?format=csv",
            Reply::Bytes(200, Some("text/csv; charset=utf-8".to_string()), b"a,b\n1,2\n".to_vec()),
        )
        .on(
            Method::Get,
            "/reports/export?format=pdf",
            Reply::Bytes(200, None, Vec::new()),
        );

    let dir = tempfile::tempdir().unwrap();
    let mut config = ctx.config.clone();
    config.export.dir = dir.path().to_string_lossy().into_owned();
    let reports = ReportService::new(ctx.client.clone(), &config);

    let file = reports.export(ExportFormat::Csv).await.unwrap();
    assert!(file.file_name.starts_with("report_"));
    assert!(file.file_name.ends_with(".csv"));

    let path = reports.save_export(&file).unwrap();
    assert_eq!(path.parent(), Some(dir.path()));
    assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n1,2\n");

    // 空文件视为失败
    assert!(reports.export(ExportFormat::Pdf).await.is_err());
}
