//! 各列表页面的资源配置

pub mod classes;
pub mod notifications;
pub mod officers;
pub mod students;
pub mod tasks;

use std::sync::RwLock;
use tracing::debug;

use crate::client::ApiClient;
use crate::controllers::FieldOption;
use crate::errors::Result;
use crate::models::classes::Class;

pub use classes::ClassResource;
pub use notifications::NotificationResource;
pub use officers::OfficerResource;
pub use students::StudentResource;
pub use tasks::TaskResource;

pub const CLASSES_ENDPOINT: &str = "/classes";

/// 表单引用校验用的班级列表
///
/// 由需要选择班级的资源在 `load_references` 中填充。
#[derive(Debug, Default)]
pub struct ClassDirectory {
    classes: RwLock<Vec<Class>>,
}

impl ClassDirectory {
    pub async fn load(&self, client: &ApiClient) -> Result<()> {
        let classes: Vec<Class> = client.get_json(CLASSES_ENDPOINT).await?;
        debug!("Class directory loaded with {} entries", classes.len());
        self.replace(classes);
        Ok(())
    }

    pub fn replace(&self, classes: Vec<Class>) {
        match self.classes.write() {
            Ok(mut guard) => *guard = classes,
            Err(poisoned) => *poisoned.into_inner() = classes,
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.classes
            .read()
            .map(|classes| classes.iter().any(|c| c.id == id))
            .unwrap_or(false)
    }

    pub fn name_of(&self, id: i64) -> Option<String> {
        self.classes
            .read()
            .ok()?
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    }

    pub fn options(&self) -> Vec<FieldOption> {
        self.classes
            .read()
            .map(|classes| {
                classes
                    .iter()
                    .map(|c| FieldOption::new(c.id, format!("{} - {}", c.class_code, c.name)))
                    .collect()
            })
            .unwrap_or_default()
    }
}
