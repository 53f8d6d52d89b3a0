use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::errors::{ConsoleError, Result};
use crate::models::files::Attachment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// multipart 中的文件字段
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// multipart 表单：若干文本字段 + 若干文件字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub texts: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    /// 将一个可序列化为 JSON 对象的值展开为文本字段
    ///
    /// `null` 字段被跳过，字符串原样保留，其它标量使用其 JSON 文本。
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self> {
        let object = match serde_json::to_value(value)? {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(ConsoleError::serialization(format!(
                    "multipart payload must be an object, got {other}"
                )));
            }
        };

        let texts = object
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect();

        Ok(Self {
            texts,
            files: Vec::new(),
        })
    }

    pub fn with_file(mut self, field: impl Into<String>, attachment: &Attachment) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            file_name: attachment.file_name.clone(),
            content_type: attachment.content_type.clone(),
            bytes: attachment.bytes.clone(),
        });
        self
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn file(&self, field: &str) -> Option<&FilePart> {
        self.files.iter().find(|part| part.field == field)
    }
}

/// 请求体编码
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

/// 发往传输层的请求；`path` 相对于 API 根地址
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub request_id: String,
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

/// 传输层返回的原始响应
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ConsoleError::serialization(format!("Unexpected response body: {e}"))
        })
    }
}
