use async_trait::async_trait;

use super::CLASSES_ENDPOINT;
use crate::client::RequestBody;
use crate::controllers::{FieldKind, FieldSpec, FormDraft, Resource};
use crate::errors::{Result, ValidationError};
use crate::models::auth::SessionUser;
use crate::models::classes::{Class, ClassPayload};
use crate::utils::validate::validate_class_code;

static SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("class_code", "Class code", FieldKind::Text),
    FieldSpec::required("name", "Class name", FieldKind::Text),
    FieldSpec::required("major", "Major", FieldKind::Text),
    FieldSpec::required("cohort", "Cohort", FieldKind::Text),
    FieldSpec::optional("homeroom_teacher", "Homeroom teacher", FieldKind::Text),
];

/// 班级列表
#[derive(Debug, Default)]
pub struct ClassResource;

#[async_trait]
impl Resource for ClassResource {
    type Record = Class;

    const NAME: &'static str = "classes";

    fn endpoint(&self) -> &str {
        CLASSES_ENDPOINT
    }

    fn schema(&self) -> &'static [FieldSpec] {
        SCHEMA
    }

    fn record_id(record: &Class) -> i64 {
        record.id
    }

    fn draft_from(&self, record: &Class) -> FormDraft {
        FormDraft::new()
            .with("class_code", record.class_code.as_str())
            .with("name", record.name.as_str())
            .with("major", record.major.as_str())
            .with("cohort", record.cohort.as_str())
            .with(
                "homeroom_teacher",
                record.homeroom_teacher.clone().unwrap_or_default(),
            )
    }

    fn validate(&self, draft: &FormDraft) -> std::result::Result<(), ValidationError> {
        validate_class_code(&draft.text("class_code"))
            .map_err(|msg| ValidationError::field("class_code", msg))
    }

    fn payload(&self, draft: &FormDraft, _user: &SessionUser) -> Result<RequestBody> {
        RequestBody::json(&ClassPayload {
            class_code: draft.text("class_code"),
            name: draft.text("name"),
            major: draft.text("major"),
            cohort: draft.text("cohort"),
            homeroom_teacher: draft.opt_text("homeroom_teacher"),
        })
    }
}
