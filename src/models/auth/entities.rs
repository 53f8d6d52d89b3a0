use serde::{Deserialize, Serialize};

use crate::utils::serde_ext::flexible_i64;

/// 当前登录用户
///
/// 登录响应中返回，序列化为 JSON 持久化到本地存储。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(alias = "full_name", alias = "name")]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    // 原始角色字符串，判断权限前需要归一化
    #[serde(default)]
    pub role: String,
}
