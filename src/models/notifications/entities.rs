use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::serde_ext::{flexible_i64, flexible_opt_i64};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "flexible_i64")]
    pub id: i64,
    pub title: String,
    #[serde(alias = "body")]
    pub content: String,
    // 发送时间
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_opt_i64")]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
}
