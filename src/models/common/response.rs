use serde::Deserialize;

// 后端错误响应体，只关心 message 字段
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// 从原始响应体解析 message，失败或为空时返回 None
    pub fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from() {
        assert_eq!(
            ErrorBody::message_from(r#"{"message": "Mã lớp đã tồn tại"}"#.as_bytes()),
            Some("Mã lớp đã tồn tại".to_string())
        );
        assert_eq!(
            ErrorBody::message_from(br#"{"error": "Unauthorized"}"#),
            Some("Unauthorized".to_string())
        );
        assert_eq!(ErrorBody::message_from(br#"{"message": "  "}"#), None);
        assert_eq!(ErrorBody::message_from(b"<html>502</html>"), None);
    }
}
