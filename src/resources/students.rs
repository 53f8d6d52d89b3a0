use async_trait::async_trait;

use crate::client::RequestBody;
use crate::controllers::{FieldSpec, FormDraft, PERMISSION_DENIED, Resource};
use crate::errors::{ConsoleError, Result};
use crate::models::auth::SessionUser;
use crate::models::students::Student;

pub const STUDENTS_ENDPOINT: &str = "/students";

/// 学生列表，只读
#[derive(Debug, Default)]
pub struct StudentResource;

#[async_trait]
impl Resource for StudentResource {
    type Record = Student;

    const NAME: &'static str = "students";
    const READ_ONLY: bool = true;

    fn endpoint(&self) -> &str {
        STUDENTS_ENDPOINT
    }

    fn schema(&self) -> &'static [FieldSpec] {
        &[]
    }

    fn record_id(record: &Student) -> i64 {
        record.id
    }

    fn draft_from(&self, _record: &Student) -> FormDraft {
        FormDraft::new()
    }

    fn payload(&self, _draft: &FormDraft, _user: &SessionUser) -> Result<RequestBody> {
        Err(ConsoleError::permission(PERMISSION_DENIED))
    }
}
