use chrono::NaiveDate;
use serde::Serialize;

// 创建 / 更新班干部任命请求
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfficerPayload {
    pub class_id: i64,
    pub user_id: i64,
    pub role_title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}
