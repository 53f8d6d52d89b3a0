use std::path::Path;

use crate::config::UploadConfig;
use crate::errors::{ConsoleError, Result};
use crate::utils::inspect_attachment;

/// 随表单一起提交的附件
///
/// 内容在附加时一次性读入内存，提交时作为 multipart 文件字段发送。
#[derive(Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// 从内存数据构造，并做扩展名 / 大小 / 魔术字节检查
    pub fn from_bytes(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        upload: &UploadConfig,
    ) -> Result<Self> {
        let file_name = file_name.into();
        let content_type =
            inspect_attachment(&file_name, &bytes, &upload.allowed_types, upload.max_size)
                .map_err(ConsoleError::validation)?;
        Ok(Self {
            file_name,
            content_type: content_type.to_string(),
            bytes,
        })
    }

    /// 读取本地文件
    pub fn from_path(path: impl AsRef<Path>, upload: &UploadConfig) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ConsoleError::file_operation("Attachment path has no file name"))?
            .to_string();
        let bytes = std::fs::read(path)?;
        Self::from_bytes(file_name, bytes, upload)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// 不打印文件内容
impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let upload = UploadConfig::default();
        let attachment =
            Attachment::from_bytes("de_bai.pdf", b"%PDF-1.7 ...".to_vec(), &upload).unwrap();
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.size(), 12);

        let err = Attachment::from_bytes("run.exe", vec![0x4D, 0x5A], &upload).unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ghi_chu.txt");
        std::fs::write(&path, "Hạn nộp thứ Sáu").unwrap();

        let attachment = Attachment::from_path(&path, &UploadConfig::default()).unwrap();
        assert_eq!(attachment.file_name, "ghi_chu.txt");
        assert_eq!(attachment.content_type, "text/plain; charset=utf-8");

        let missing = Attachment::from_path(dir.path().join("nope.txt"), &UploadConfig::default());
        assert_eq!(missing.unwrap_err().code(), "E011");
    }
}
