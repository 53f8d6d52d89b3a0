//! 宽松的反序列化函数
//!
//! 后端返回的 ID 有时是数字、有时是数字字符串；日期有时是 `YYYY-MM-DD`，
//! 有时是完整的 ISO 8601 时间戳。

use chrono::NaiveDate;
use serde::de::{Error, Unexpected, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

struct I64Visitor;

impl<'de> Visitor<'de> for I64Visitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        if value <= i64::MAX as u64 {
            Ok(value as i64)
        } else {
            Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
        }
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        value
            .trim()
            .parse()
            .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
    }
}

/// 数字或数字字符串 -> i64
pub fn flexible_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(I64Visitor)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeId {
    Number(i64),
    Text(String),
}

/// 可空版本：`null`、缺失与空字符串都视为 None
pub fn flexible_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<MaybeId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(MaybeId::Number(n)) => Ok(Some(n)),
        Some(MaybeId::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(MaybeId::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::invalid_value(Unexpected::Str(&s), &"an integer id")),
    }
}

/// 取日期部分，兼容 "2026-09-01" 与 "2026-09-01T00:00:00.000Z"
pub fn parse_loose_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn loose_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_loose_date(&raw)
        .ok_or_else(|| D::Error::invalid_value(Unexpected::Str(&raw), &"a YYYY-MM-DD date"))
}

pub fn loose_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_loose_date(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::invalid_value(Unexpected::Str(&raw), &"a YYYY-MM-DD date")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "flexible_i64")]
        id: i64,
        #[serde(default, deserialize_with = "flexible_opt_i64")]
        class_id: Option<i64>,
        #[serde(default, deserialize_with = "loose_opt_date")]
        end_date: Option<NaiveDate>,
    }

    #[test]
    fn test_numeric_and_string_ids() {
        let a: Row = serde_json::from_str(r#"{"id": 7, "class_id": "12"}"#).unwrap();
        assert_eq!(a.id, 7);
        assert_eq!(a.class_id, Some(12));

        let b: Row = serde_json::from_str(r#"{"id": "8", "class_id": null}"#).unwrap();
        assert_eq!(b.id, 8);
        assert_eq!(b.class_id, None);

        let c: Row = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        assert_eq!(c.class_id, None);
        assert!(serde_json::from_str::<Row>(r#"{"id": "x"}"#).is_err());
    }

    #[test]
    fn test_loose_dates() {
        let row: Row =
            serde_json::from_str(r#"{"id": 1, "end_date": "2026-10-17T00:00:00.000Z"}"#).unwrap();
        assert_eq!(row.end_date, NaiveDate::from_ymd_opt(2026, 10, 17));

        let empty: Row = serde_json::from_str(r#"{"id": 1, "end_date": ""}"#).unwrap();
        assert_eq!(empty.end_date, None);
    }
}
