use async_trait::async_trait;

use super::ClassDirectory;
use crate::client::{ApiClient, RequestBody};
use crate::controllers::{FieldKind, FieldSpec, FormDraft, Resource};
use crate::errors::{Result, ValidationError};
use crate::models::auth::SessionUser;
use crate::models::notifications::{Notification, NotificationPayload};

pub const NOTIFICATIONS_ENDPOINT: &str = "/notifications";

static SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("title", "Title", FieldKind::Text),
    FieldSpec::required("content", "Content", FieldKind::Multiline),
    // 留空表示发给全部班级
    FieldSpec::optional("class_id", "Class", FieldKind::Reference),
];

/// 最新的 N 条通知（导航栏的“有新通知”标记使用）
pub async fn latest(client: &ApiClient, limit: u32) -> Result<Vec<Notification>> {
    client
        .get_json(&format!("{NOTIFICATIONS_ENDPOINT}/latest?limit={limit}"))
        .await
}

#[derive(Debug, Default)]
pub struct NotificationResource {
    classes: ClassDirectory,
}

impl NotificationResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> &ClassDirectory {
        &self.classes
    }
}

#[async_trait]
impl Resource for NotificationResource {
    type Record = Notification;

    const NAME: &'static str = "notifications";

    fn endpoint(&self) -> &str {
        NOTIFICATIONS_ENDPOINT
    }

    fn schema(&self) -> &'static [FieldSpec] {
        SCHEMA
    }

    fn record_id(record: &Notification) -> i64 {
        record.id
    }

    fn draft_from(&self, record: &Notification) -> FormDraft {
        FormDraft::new()
            .with("title", record.title.as_str())
            .with("content", record.content.as_str())
            .with(
                "class_id",
                record.class_id.map(|id| id.to_string()).unwrap_or_default(),
            )
    }

    fn validate(&self, draft: &FormDraft) -> std::result::Result<(), ValidationError> {
        match draft.opt_int("class_id")? {
            Some(id) if !self.classes.contains(id) => Err(ValidationError::field(
                "class_id",
                "is not in the class list",
            )),
            _ => Ok(()),
        }
    }

    fn payload(&self, draft: &FormDraft, user: &SessionUser) -> Result<RequestBody> {
        RequestBody::json(&NotificationPayload {
            title: draft.text("title"),
            content: draft.text("content"),
            class_id: draft.opt_int("class_id")?,
            sender_id: user.id,
            sender_name: user.display_name.clone(),
        })
    }

    async fn load_references(&self, client: &ApiClient) -> Result<()> {
        self.classes.load(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_needs_no_class() {
        let resource = NotificationResource::new();
        let draft = FormDraft::new()
            .with("title", "Lịch thi")
            .with("content", "Thi giữa kỳ vào thứ Hai");
        assert!(resource.validate(&draft).is_ok());

        let targeted = draft.with("class_id", "5");
        assert_eq!(
            resource.validate(&targeted).unwrap_err().field.as_deref(),
            Some("class_id")
        );
    }
}
