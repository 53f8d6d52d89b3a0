//! 班干部任命
//!
//! 列表由 `/class-officers` 与 `/users` 两次并发请求拼出；结束日期早于当天的任命
//! 不显示，并在后台发起删除。表单中的负责人只能从所选班级的成员名册中选择。

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::ClassDirectory;
use crate::client::{ApiClient, RequestBody};
use crate::controllers::{FieldKind, FieldOption, FieldSpec, FormDraft, Resource};
use crate::errors::{Result, ValidationError};
use crate::models::auth::SessionUser;
use crate::models::officers::{OfficerAssignment, OfficerPayload};
use crate::models::students::{ClassMember, Student};
use crate::runtime::{ReconcileReport, spawn_expired_cleanup};
use crate::utils::{DATE_FORMAT, validate_date_order};

pub const OFFICERS_ENDPOINT: &str = "/class-officers";
pub const USERS_ENDPOINT: &str = "/users";
pub const NOT_A_MEMBER: &str = "is not a member of the selected class";

static SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("class_id", "Class", FieldKind::Reference),
    FieldSpec::required("user_id", "Assignee", FieldKind::Reference).depends_on("class_id"),
    FieldSpec::required("role_title", "Role", FieldKind::Text),
    FieldSpec::required("start_date", "Start date", FieldKind::Date),
    FieldSpec::optional("end_date", "End date", FieldKind::Date),
];

pub fn members_endpoint(class_id: i64) -> String {
    format!("/classes/{class_id}/members")
}

/// 按评估日期拆分：返回（仍有效的记录，过期记录的 ID）
///
/// 对已过滤的结果再次调用不会有任何变化。
pub fn split_expired(
    records: Vec<OfficerAssignment>,
    today: NaiveDate,
) -> (Vec<OfficerAssignment>, Vec<i64>) {
    let (expired, live): (Vec<_>, Vec<_>) =
        records.into_iter().partition(|r| r.is_expired(today));
    (live, expired.into_iter().map(|r| r.id).collect())
}

#[derive(Default)]
pub struct OfficerResource {
    // 固定评估日期，未设置时取本地当天
    today: Option<NaiveDate>,
    classes: ClassDirectory,
    // 最近一次加载的名册及其所属班级
    roster: RwLock<Option<(i64, Vec<ClassMember>)>>,
    cleanup: Mutex<Option<JoinHandle<ReconcileReport>>>,
}

impl OfficerResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn classes(&self) -> &ClassDirectory {
        &self.classes
    }

    /// 取走最近一次后台清理任务的句柄
    pub fn take_cleanup(&self) -> Option<JoinHandle<ReconcileReport>> {
        self.cleanup.lock().ok().and_then(|mut guard| guard.take())
    }

    fn roster_contains(&self, class_id: i64, user_id: i64) -> bool {
        self.roster
            .read()
            .map(|roster| match roster.as_ref() {
                Some((loaded_for, members)) => {
                    *loaded_for == class_id && members.iter().any(|m| m.user_id == user_id)
                }
                None => false,
            })
            .unwrap_or(false)
    }

    fn store_roster(&self, class_id: i64, members: Vec<ClassMember>) {
        let entry = Some((class_id, members));
        match self.roster.write() {
            Ok(mut guard) => *guard = entry,
            Err(poisoned) => *poisoned.into_inner() = entry,
        }
    }

    fn schedule_cleanup(&self, client: &ApiClient, expired: Vec<i64>) {
        info!(
            "Hiding {} expired officer assignment(s), deleting in background",
            expired.len()
        );
        let handle = spawn_expired_cleanup(client.clone(), OFFICERS_ENDPOINT.to_string(), expired);
        if let Ok(mut guard) = self.cleanup.lock() {
            *guard = Some(handle);
        }
    }
}

#[async_trait]
impl Resource for OfficerResource {
    type Record = OfficerAssignment;

    const NAME: &'static str = "class-officers";

    fn endpoint(&self) -> &str {
        OFFICERS_ENDPOINT
    }

    fn schema(&self) -> &'static [FieldSpec] {
        SCHEMA
    }

    fn record_id(record: &OfficerAssignment) -> i64 {
        record.id
    }

    fn draft_from(&self, record: &OfficerAssignment) -> FormDraft {
        FormDraft::new()
            .with("class_id", record.class_id.to_string())
            .with("user_id", record.user_id.to_string())
            .with("role_title", record.role_title.as_str())
            .with("start_date", record.start_date.format(DATE_FORMAT).to_string())
            .with(
                "end_date",
                record
                    .end_date
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
            )
    }

    fn validate(&self, draft: &FormDraft) -> std::result::Result<(), ValidationError> {
        let class_id = draft.int("class_id")?;
        if !self.classes.contains(class_id) {
            return Err(ValidationError::field("class_id", "is not in the class list"));
        }

        let user_id = draft.int("user_id")?;
        if !self.roster_contains(class_id, user_id) {
            return Err(ValidationError::field("user_id", NOT_A_MEMBER));
        }

        let start = draft.date("start_date")?;
        let end = draft.opt_date("end_date")?;
        validate_date_order(start, end).map_err(|msg| ValidationError::field("end_date", msg))
    }

    fn payload(&self, draft: &FormDraft, _user: &SessionUser) -> Result<RequestBody> {
        RequestBody::json(&OfficerPayload {
            class_id: draft.int("class_id")?,
            user_id: draft.int("user_id")?,
            role_title: draft.text("role_title"),
            start_date: draft.date("start_date")?,
            end_date: draft.opt_date("end_date")?,
        })
    }

    async fn fetch(&self, client: &ApiClient) -> Result<Vec<OfficerAssignment>> {
        // 班级目录与列表一起加载，班级名称在返回前就能补全
        let (records, users, ()) = tokio::try_join!(
            client.get_json::<Vec<OfficerAssignment>>(OFFICERS_ENDPOINT),
            client.get_json::<Vec<Student>>(USERS_ENDPOINT),
            self.classes.load(client),
        )?;

        let (mut live, expired) = split_expired(records, self.today());
        if !expired.is_empty() {
            self.schedule_cleanup(client, expired);
        }

        let names: HashMap<i64, String> = users.into_iter().map(|u| (u.id, u.full_name)).collect();
        for record in &mut live {
            if let Some(name) = names.get(&record.user_id) {
                record.user_name = Some(name.clone());
            }
            if record.class_name.is_none() {
                record.class_name = self.classes.name_of(record.class_id);
            }
        }
        Ok(live)
    }

    async fn refresh_options(
        &self,
        client: &ApiClient,
        field: &str,
        draft: &FormDraft,
    ) -> Result<Vec<FieldOption>> {
        if field != "user_id" {
            return Ok(Vec::new());
        }
        let class_id = draft.int("class_id")?;
        let members: Vec<ClassMember> = client.get_json(&members_endpoint(class_id)).await?;
        debug!("Roster of class {} has {} members", class_id, members.len());

        let options = members
            .iter()
            .map(|m| FieldOption::new(m.user_id, m.full_name.as_str()))
            .collect();
        self.store_roster(class_id, members);
        Ok(options)
    }
}
