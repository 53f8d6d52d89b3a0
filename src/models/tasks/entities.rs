use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::serde_ext::{flexible_i64, flexible_opt_i64, loose_date, loose_opt_date};

// 任务优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const LOW: &'static str = "low";
    pub const MEDIUM: &'static str = "medium";
    pub const HIGH: &'static str = "high";

    pub fn options() -> &'static [&'static str] {
        &[Self::LOW, Self::MEDIUM, Self::HIGH]
    }
}

impl<'de> Deserialize<'de> for TaskPriority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "{}", TaskPriority::LOW),
            TaskPriority::Medium => write!(f, "{}", TaskPriority::MEDIUM),
            TaskPriority::High => write!(f, "{}", TaskPriority::HIGH),
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    // 兼容旧数据中的越南语取值
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::utils::role::fold_key(s).as_str() {
            "low" | "thap" => Ok(TaskPriority::Low),
            "medium" | "trungbinh" => Ok(TaskPriority::Medium),
            "high" | "cao" => Ok(TaskPriority::High),
            _ => Err(format!("Invalid task priority: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "flexible_i64")]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "loose_date")]
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    // 附件引用（服务端返回的下载地址或文件名）
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default, deserialize_with = "loose_opt_date")]
    pub created_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_opt_i64")]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_i64")]
    pub assigned_by: Option<i64>,
    #[serde(default)]
    pub assigned_by_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parsing() {
        assert_eq!("HIGH".parse::<TaskPriority>(), Ok(TaskPriority::High));
        assert_eq!("Trung bình".parse::<TaskPriority>(), Ok(TaskPriority::Medium));
        assert_eq!("thấp".parse::<TaskPriority>(), Ok(TaskPriority::Low));
        assert!("urgent".parse::<TaskPriority>().is_err());
        assert_eq!(TaskPriority::Medium.to_string(), "medium");
    }

    #[test]
    fn test_task_deserialize() {
        let task: Task = serde_json::from_str(
            r#"{
                "id": "3",
                "title": "Nộp báo cáo",
                "due_date": "2026-11-01T00:00:00Z",
                "priority": "high",
                "class_id": 2,
                "assigned_by_name": "Nguyễn Văn A"
            }"#,
        )
        .unwrap();
        assert_eq!(task.id, 3);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        assert_eq!(task.attachment, None);
    }
}
