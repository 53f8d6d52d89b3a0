use serde::Serialize;

// 创建 / 更新通知请求
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub content: String,
    // 为空表示发给所有班级
    pub class_id: Option<i64>,
    pub sender_id: i64,
    pub sender_name: String,
}
