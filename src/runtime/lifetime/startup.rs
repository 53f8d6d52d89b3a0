use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::{ApiClient, ReqwestTransport};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::session::{FileStorage, LocalStorage, SessionStore};

/// 应用根部构造的共享对象，之后以参数形式传给各组件
pub struct StartupContext {
    pub storage: Arc<dyn LocalStorage>,
    pub session: Arc<SessionStore>,
    pub client: ApiClient,
}

/// 准备控制台启动的上下文
/// 包括本地存储、会话恢复和 HTTP 客户端
pub fn prepare_console_startup(config: &AppConfig) -> Result<StartupContext> {
    let storage: Arc<dyn LocalStorage> =
        Arc::new(FileStorage::new(&config.session.storage_path));
    debug!("Local storage at {}", config.session.storage_path);

    let session = Arc::new(SessionStore::hydrate(storage.clone(), &config.session));
    match session.current() {
        Some(user) => info!("Logged in as {} ({})", user.display_name, user.role),
        None => warn!("No stored session, login required"),
    }

    let transport = Arc::new(ReqwestTransport::new(config.api_base_url())?);
    let client = ApiClient::new(transport, storage.clone(), config);
    info!("API client targeting {}", config.api_base_url());

    Ok(StartupContext {
        storage,
        session,
        client,
    })
}
