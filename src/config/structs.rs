use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub permissions: PermissionConfig,
    pub ui: UiConfig,
    pub upload: UploadConfig,
    pub export: ExportConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
    pub log_dir: String, // 为空时日志输出到 stderr
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            system_name: "Classroom Console".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_dir: String::new(),
        }
    }
}

/// 后端 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    // 服务端未返回 message 时展示的提示
    pub fallback_error_message: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            fallback_error_message: "Có lỗi xảy ra, vui lòng thử lại sau.".to_string(),
        }
    }
}

/// 会话持久化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub storage_path: String, // 本地存储文件路径
    pub user_key: String,
    pub token_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: ".classroom/storage.json".to_string(),
            user_key: "user".to_string(),
            token_key: "token".to_string(),
        }
    }
}

/// 权限配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    // 可执行增删改的角色（归一化之后的形式）
    pub privileged_roles: Vec<String>,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            privileged_roles: vec!["admin".to_string(), "giangvien".to_string()],
        }
    }
}

/// 界面配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub success_banner_ttl_ms: u64,
    pub latest_notifications: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            success_banner_ttl_ms: 3000,
            latest_notifications: 5,
        }
    }
}

/// 附件上传配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_size: usize,            // 单文件最大字节数
    pub allowed_types: Vec<String>, // 允许的扩展名
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size: 10 * 1024 * 1024,
            allowed_types: [
                ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".png",
                ".jpg", ".jpeg", ".txt", ".md",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// 报表导出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: "exports".to_string(),
        }
    }
}
