use chrono::NaiveDate;
use serde::Serialize;

use super::entities::TaskPriority;

// 创建 / 更新任务请求
//
// 不带附件时以 JSON 提交；带附件时逐字段展开为 multipart 文本字段
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPayload {
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub class_id: i64,
    pub assigned_by: i64,
    pub assigned_by_name: String,
}
