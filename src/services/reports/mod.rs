//! 统计与导出

pub mod export;

use std::path::{Path, PathBuf};

use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::reports::{ExportFile, ExportFormat, Statistics};

pub const STATISTICS_ENDPOINT: &str = "/reports/statistics";
pub const EXPORT_ENDPOINT: &str = "/reports/export";

pub struct ReportService {
    client: ApiClient,
    export_dir: PathBuf,
}

impl ReportService {
    pub fn new(client: ApiClient, config: &AppConfig) -> Self {
        Self {
            client,
            export_dir: PathBuf::from(&config.export.dir),
        }
    }

    pub(crate) fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    // 汇总统计
    pub async fn statistics(&self) -> Result<Statistics> {
        self.client.get_json(STATISTICS_ENDPOINT).await
    }

    // 下载导出文件
    pub async fn export(&self, format: ExportFormat) -> Result<ExportFile> {
        export::handle_export(self, format).await
    }

    // 保存到导出目录，返回写入的路径
    pub fn save_export(&self, file: &ExportFile) -> Result<PathBuf> {
        export::save_to(&self.export_dir, file)
    }
}
