use serde::Serialize;

// 创建 / 更新班级请求，两者字段相同
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassPayload {
    pub class_code: String,
    pub name: String,
    pub major: String,
    pub cohort: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homeroom_teacher: Option<String>,
}
