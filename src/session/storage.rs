//! 本地持久化键值存储
//!
//! 对应浏览器的 localStorage：字符串键、字符串值，进程重启后仍然存在。

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::errors::{ConsoleError, Result};

pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// 以单个 JSON 文件保存全部键值
pub struct FileStorage {
    path: PathBuf,
    // 串行化同一进程内的读改写
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            ConsoleError::storage(format!(
                "Storage file {} is corrupt: {e}",
                self.path.display()
            ))
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        // 先写临时文件再重命名，避免写到一半留下损坏的文件
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("Storage file {} written", self.path.display());
        Ok(())
    }

    fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ConsoleError::storage("Storage lock poisoned"))?;
        f()
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.locked(|| Ok(self.read_map()?.get(key).cloned()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.locked(|| {
            // 文件损坏时直接覆盖
            let mut map = self.read_map().unwrap_or_default();
            map.insert(key.to_string(), value.to_string());
            self.write_map(&map)
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.locked(|| {
            match self.read_map() {
                Ok(mut map) => {
                    if map.remove(key).is_some() {
                        self.write_map(&map)?;
                    }
                    Ok(())
                }
                // 损坏的文件无法部分删除，整体清空
                Err(_) => self.write_map(&BTreeMap::new()),
            }
        })
    }
}

/// 内存存储，测试与临时会话使用
#[derive(Default)]
pub struct MemoryStorage {
    items: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}
