use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::serde_ext::{flexible_i64, loose_date, loose_opt_date};

/// 班干部任命
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficerAssignment {
    #[serde(deserialize_with = "flexible_i64")]
    pub id: i64,
    #[serde(deserialize_with = "flexible_i64")]
    pub class_id: i64,
    #[serde(deserialize_with = "flexible_i64")]
    pub user_id: i64,
    // 职务名称，如 "Lớp trưởng"
    pub role_title: String,
    #[serde(deserialize_with = "loose_date")]
    pub start_date: NaiveDate,
    #[serde(default, deserialize_with = "loose_opt_date")]
    pub end_date: Option<NaiveDate>,
    // 以下为后端冗余的展示字段，可能缺失
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

impl OfficerAssignment {
    /// 结束日期严格早于 `today` 视为已过期
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end < today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(end: Option<&str>) -> OfficerAssignment {
        OfficerAssignment {
            id: 1,
            class_id: 1,
            user_id: 1,
            role_title: "Lớp trưởng".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: end.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            class_name: None,
            user_name: None,
        }
    }

    #[test]
    fn test_is_expired() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert!(assignment(Some("2026-10-17")).is_expired(today));
        assert!(!assignment(Some("2026-10-18")).is_expired(today));
        assert!(!assignment(Some("2027-06-30")).is_expired(today));
        assert!(!assignment(None).is_expired(today));
    }
}
