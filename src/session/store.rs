use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use super::storage::LocalStorage;
use crate::config::SessionConfig;
use crate::errors::{ConsoleError, Result};
use crate::models::auth::SessionUser;
use crate::shell::routes::Route;

/// 当前登录状态的唯一来源
///
/// 在应用根部构造一次，以 `Arc<SessionStore>` 的形式显式传给需要它的组件。
pub struct SessionStore {
    storage: Arc<dyn LocalStorage>,
    user_key: String,
    token_key: String,
    current: RwLock<Option<SessionUser>>,
}

impl SessionStore {
    /// 从本地存储恢复会话；数据缺失或无法解析时视为未登录
    pub fn hydrate(storage: Arc<dyn LocalStorage>, config: &SessionConfig) -> Self {
        let user = match storage.get_item(&config.user_key) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => {
                    info!("Session restored for user {}", user.id);
                    Some(user)
                }
                Err(e) => {
                    warn!("Stored session user is invalid, ignoring it: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read stored session: {}", e);
                None
            }
        };

        Self {
            storage,
            user_key: config.user_key.clone(),
            token_key: config.token_key.clone(),
            current: RwLock::new(user),
        }
    }

    pub fn current(&self) -> Option<SessionUser> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// 当前用户，未登录时返回认证错误
    pub fn require_user(&self) -> Result<SessionUser> {
        self.current()
            .ok_or_else(|| ConsoleError::authentication("Please log in first"))
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get_item(&self.token_key).ok().flatten()
    }

    /// 登录成功后写入用户与令牌
    ///
    /// 先写用户再写令牌；任一步失败都会清除整个会话，
    /// 存储中不会只剩令牌或只剩用户。
    pub fn set(&self, user: SessionUser, token: &str) -> Result<()> {
        let written = self
            .storage
            .set_item(&self.user_key, &serde_json::to_string(&user)?)
            .and_then(|()| self.storage.set_item(&self.token_key, token));
        if let Err(e) = written {
            warn!("Failed to persist session, rolling back: {}", e);
            self.clear();
            return Err(e);
        }
        self.set_current(user)
    }

    /// 仅替换用户信息（例如资料修改后）
    pub fn update_user(&self, user: SessionUser) -> Result<()> {
        self.storage
            .set_item(&self.user_key, &serde_json::to_string(&user)?)?;
        self.set_current(user)
    }

    fn set_current(&self, user: SessionUser) -> Result<()> {
        let mut guard = self
            .current
            .write()
            .map_err(|_| ConsoleError::storage("Session lock poisoned"))?;
        *guard = Some(user);
        Ok(())
    }

    /// 退出登录：清除本地存储与内存状态，返回应跳转的页面
    pub fn clear(&self) -> Route {
        for key in [&self.user_key, &self.token_key] {
            if let Err(e) = self.storage.remove_item(key) {
                warn!("Failed to remove '{}' from storage: {}", key, e);
            }
        }
        match self.current.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        info!("Session cleared");
        Route::Login
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemoryStorage;

    fn user() -> SessionUser {
        SessionUser {
            id: 7,
            display_name: "Trần Thị B".to_string(),
            email: "b@hust.edu.vn".to_string(),
            avatar: None,
            role: "Giảng viên".to_string(),
        }
    }

    #[test]
    fn test_set_hydrate_clear() {
        let storage = Arc::new(MemoryStorage::new());
        let config = SessionConfig::default();

        let store = SessionStore::hydrate(storage.clone(), &config);
        assert!(!store.is_authenticated());
        assert!(store.require_user().is_err());

        store.set(user(), "jwt-token").unwrap();
        assert_eq!(store.current(), Some(user()));
        assert_eq!(store.token(), Some("jwt-token".to_string()));

        // 模拟页面刷新
        let reloaded = SessionStore::hydrate(storage.clone(), &config);
        assert_eq!(reloaded.current(), Some(user()));

        assert_eq!(reloaded.clear(), Route::Login);
        assert!(!reloaded.is_authenticated());
        assert_eq!(reloaded.token(), None);
        assert!(storage.is_empty());
    }

    // 对指定键的写入总是失败
    struct FailingStorage {
        inner: MemoryStorage,
        broken_key: String,
    }

    impl LocalStorage for FailingStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            if key == self.broken_key {
                return Err(ConsoleError::storage("Disk full"));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn test_failed_write_leaves_no_partial_session() {
        let config = SessionConfig::default();
        for broken_key in [&config.user_key, &config.token_key] {
            let storage = Arc::new(FailingStorage {
                inner: MemoryStorage::new(),
                broken_key: broken_key.clone(),
            });
            let store = SessionStore::hydrate(storage.clone(), &config);

            assert!(store.set(user(), "jwt-token").is_err());
            assert!(!store.is_authenticated());
            assert_eq!(store.token(), None);
            assert!(storage.inner.is_empty());

            // 重新加载后同样是未登录
            assert!(!SessionStore::hydrate(storage, &config).is_authenticated());
        }
    }

    #[test]
    fn test_invalid_stored_user_is_no_session() {
        let storage = Arc::new(MemoryStorage::new());
        let config = SessionConfig::default();
        storage.set_item(&config.user_key, "{\"id\": ").unwrap();

        let store = SessionStore::hydrate(storage, &config);
        assert!(!store.is_authenticated());
    }
}
