use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{EXPORT_ENDPOINT, ReportService};
use crate::errors::{ConsoleError, Result};
use crate::models::reports::{ExportFile, ExportFormat};
use crate::utils::file_magic::{extension_for_mime, mime_type_for};

pub async fn handle_export(service: &ReportService, format: ExportFormat) -> Result<ExportFile> {
    let path = format!("{EXPORT_ENDPOINT}?format={format}");
    let response = service.client().get_bytes(&path).await?;

    if response.body.is_empty() {
        return Err(ConsoleError::server("Export returned an empty file"));
    }

    // 扩展名优先取响应的 Content-Type，缺失时使用请求的格式
    let extension = response
        .content_type
        .as_deref()
        .and_then(extension_for_mime)
        .unwrap_or(format.as_str());
    let content_type = response
        .content_type
        .clone()
        .unwrap_or_else(|| mime_type_for(&format!(".{extension}")).to_string());

    let file_name = format!(
        "report_{}.{}",
        Local::now().format("%Y%m%d_%H%M%S"),
        extension
    );
    info!("Exported {} ({} bytes)", file_name, response.body.len());

    Ok(ExportFile {
        file_name,
        content_type,
        bytes: response.body,
    })
}

pub fn save_to(dir: &Path, file: &ExportFile) -> Result<PathBuf> {
    // 只取文件名部分，避免写出导出目录
    let name = Path::new(&file.file_name)
        .file_name()
        .ok_or_else(|| ConsoleError::file_operation("Export file has no name"))?;

    std::fs::create_dir_all(dir)?;
    let target = dir.join(name);
    std::fs::write(&target, &file.bytes)?;
    info!("Export saved to {}", target.display());
    Ok(target)
}
