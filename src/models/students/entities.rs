use serde::{Deserialize, Serialize};

use crate::utils::serde_ext::flexible_i64;

// 学生 / 用户摘要（`/students` 与 `/users` 共用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(alias = "name", alias = "display_name")]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// 班级成员名册条目（`/classes/{id}/members`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMember {
    #[serde(deserialize_with = "flexible_i64")]
    pub user_id: i64,
    #[serde(alias = "name", alias = "display_name")]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
}
