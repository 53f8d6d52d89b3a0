use async_trait::async_trait;

use super::ClassDirectory;
use crate::client::{ApiClient, MultipartForm, RequestBody};
use crate::controllers::{FieldKind, FieldSpec, FormDraft, Resource};
use crate::errors::{ConsoleError, Result, ValidationError};
use crate::models::auth::SessionUser;
use crate::models::tasks::{Task, TaskPayload, TaskPriority};
use crate::utils::DATE_FORMAT;

pub const TASKS_ENDPOINT: &str = "/tasks";
/// multipart 中附件的字段名
pub const ATTACHMENT_FIELD: &str = "attachment";

const PRIORITIES: &[&str] = &[TaskPriority::LOW, TaskPriority::MEDIUM, TaskPriority::HIGH];

static SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("title", "Title", FieldKind::Text),
    FieldSpec::optional("description", "Description", FieldKind::Multiline),
    FieldSpec::required("due_date", "Due date", FieldKind::Date),
    FieldSpec::required("priority", "Priority", FieldKind::Select(PRIORITIES)),
    FieldSpec::required("class_id", "Class", FieldKind::Reference),
];

/// 任务列表；提交时带附件则使用 multipart，否则使用 JSON
#[derive(Debug, Default)]
pub struct TaskResource {
    classes: ClassDirectory,
}

impl TaskResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> &ClassDirectory {
        &self.classes
    }
}

#[async_trait]
impl Resource for TaskResource {
    type Record = Task;

    const NAME: &'static str = "tasks";
    const ACCEPTS_ATTACHMENT: bool = true;

    fn endpoint(&self) -> &str {
        TASKS_ENDPOINT
    }

    fn schema(&self) -> &'static [FieldSpec] {
        SCHEMA
    }

    fn record_id(record: &Task) -> i64 {
        record.id
    }

    // 附件不回填，编辑时需要重新选择
    fn draft_from(&self, record: &Task) -> FormDraft {
        FormDraft::new()
            .with("title", record.title.as_str())
            .with("description", record.description.clone().unwrap_or_default())
            .with("due_date", record.due_date.format(DATE_FORMAT).to_string())
            .with("priority", record.priority.to_string())
            .with(
                "class_id",
                record.class_id.map(|id| id.to_string()).unwrap_or_default(),
            )
    }

    fn validate(&self, draft: &FormDraft) -> std::result::Result<(), ValidationError> {
        let class_id = draft.int("class_id")?;
        if !self.classes.contains(class_id) {
            return Err(ValidationError::field("class_id", "is not in the class list"));
        }
        Ok(())
    }

    fn payload(&self, draft: &FormDraft, user: &SessionUser) -> Result<RequestBody> {
        let priority = draft
            .text("priority")
            .parse::<TaskPriority>()
            .map_err(ConsoleError::validation)?;
        let payload = TaskPayload {
            title: draft.text("title"),
            description: draft.opt_text("description"),
            due_date: draft.date("due_date")?,
            priority,
            class_id: draft.int("class_id")?,
            assigned_by: user.id,
            assigned_by_name: user.display_name.clone(),
        };

        match draft.attachment() {
            Some(file) => Ok(RequestBody::Multipart(
                MultipartForm::from_serializable(&payload)?.with_file(ATTACHMENT_FIELD, file),
            )),
            None => RequestBody::json(&payload),
        }
    }

    async fn load_references(&self, client: &ApiClient) -> Result<()> {
        self.classes.load(client).await
    }
}
