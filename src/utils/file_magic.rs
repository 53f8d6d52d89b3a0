//! 附件的客户端检查：扩展名、大小、魔术字节与 MIME 类型
//!
//! 在发出 multipart 请求之前执行，避免把明显不合法的文件送到服务端。

use std::path::Path;

/// 提取小写扩展名（包含点号，如 ".pdf"），无扩展名时返回空串
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// 根据扩展名推断 MIME 类型
pub fn mime_type_for(extension: &str) -> &'static str {
    match extension {
        ".pdf" => "application/pdf",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".xls" => "application/vnd.ms-excel",
        ".xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".ppt" => "application/vnd.ms-powerpoint",
        ".pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ".zip" => "application/zip",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        ".csv" => "text/csv; charset=utf-8",
        ".txt" | ".md" => "text/plain; charset=utf-8",
        ".json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// 反向映射：根据响应的 Content-Type 选择导出文件扩展名
pub fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    match essence {
        "application/pdf" => Some("pdf"),
        "text/csv" => Some("csv"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some("xlsx"),
        "application/json" => Some("json"),
        _ => None,
    }
}

/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// # Arguments
/// * `data` - 文件内容（至少前几个字节）
/// * `extension` - 文件扩展名（包含点号，如 ".png"）
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    const ZIP: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
    const OLE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

    match extension.to_lowercase().as_str() {
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        ".webp" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",
        ".pdf" => data.starts_with(b"%PDF"),
        ".doc" | ".xls" | ".ppt" => data.starts_with(&OLE),
        ".docx" | ".xlsx" | ".pptx" | ".zip" => data.starts_with(&ZIP),
        // 文本格式不检查
        ".txt" | ".md" | ".csv" | ".json" => true,
        _ => false,
    }
}

/// 附件检查：返回推断出的 MIME 类型，或一条可直接展示给用户的错误
pub fn inspect_attachment(
    file_name: &str,
    data: &[u8],
    allowed_types: &[String],
    max_size: usize,
) -> Result<&'static str, String> {
    let extension = extension_of(file_name);
    if !allowed_types
        .iter()
        .any(|allowed| allowed.to_lowercase() == extension)
    {
        return Err(format!("File type '{extension}' is not allowed"));
    }
    if data.len() > max_size {
        return Err(format!(
            "File is too large ({} bytes, limit {max_size} bytes)",
            data.len()
        ));
    }
    if !validate_magic_bytes(data, &extension) {
        return Err("File content does not match its extension".to_string());
    }
    Ok(mime_type_for(&extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec![".pdf".to_string(), ".png".to_string(), ".txt".to_string()]
    }

    #[test]
    fn test_png_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png_header, ".png"));
        assert!(validate_magic_bytes(&png_header, ".PNG"));
        assert!(!validate_magic_bytes(&png_header, ".jpg"));
    }

    #[test]
    fn test_office_magic() {
        let zip_header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip_header, ".docx"));
        assert!(validate_magic_bytes(&zip_header, ".xlsx"));
        assert!(!validate_magic_bytes(&zip_header, ".doc"));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".txt"));
        assert!(!validate_magic_bytes(&[0x4D, 0x5A], ".exe"));
    }

    #[test]
    fn test_inspect_attachment() {
        assert_eq!(
            inspect_attachment("De_cuong.PDF", b"%PDF-1.7", &allowed(), 1024),
            Ok("application/pdf")
        );
        assert!(
            inspect_attachment("virus.exe", &[0x4D, 0x5A], &allowed(), 1024)
                .unwrap_err()
                .contains("not allowed")
        );
        assert!(
            inspect_attachment("big.txt", &[b'a'; 32], &allowed(), 16)
                .unwrap_err()
                .contains("too large")
        );
        assert!(
            inspect_attachment("fake.pdf", b"hello", &allowed(), 1024)
                .unwrap_err()
                .contains("does not match")
        );
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("text/csv; charset=utf-8"), Some("csv"));
        assert_eq!(extension_for_mime("application/pdf"), Some("pdf"));
        assert_eq!(extension_for_mime("application/octet-stream"), None);
    }
}
