use serde::{Deserialize, Serialize};

use crate::utils::serde_ext::flexible_i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    // 班级ID
    #[serde(deserialize_with = "flexible_i64")]
    pub id: i64,
    // 班级代码
    pub class_code: String,
    // 班级名称
    #[serde(alias = "class_name")]
    pub name: String,
    // 专业
    #[serde(default)]
    pub major: String,
    // 年级 / 届
    #[serde(default)]
    pub cohort: String,
    // 班主任姓名
    #[serde(default)]
    pub homeroom_teacher: Option<String>,
}
