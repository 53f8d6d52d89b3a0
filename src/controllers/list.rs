//! 通用的增删改查列表控制器
//!
//! 每个列表页面只是一个 [`Resource`] 配置；加载、横幅、表单、删除确认与
//! 权限判断都在这里实现一次。所有操作都不会把错误抛给调用方，
//! 而是返回 [`ActionOutcome`] 并把提示写入状态。

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::form::{FormController, FormDraft, FormMode, FormState};
use super::permission::{PERMISSION_DENIED, PermissionGate};
use super::resource::{FieldOption, Resource};
use crate::client::{ApiClient, Method};
use crate::config::{AppConfig, UploadConfig};
use crate::errors::{ConsoleError, ValidationError};
use crate::models::files::Attachment;
use crate::session::SessionStore;

pub const CREATED: &str = "Created successfully";
pub const UPDATED: &str = "Updated successfully";
pub const DELETED: &str = "Deleted successfully";
pub const NOT_FOUND: &str = "Record not found";

/// 列表上方的状态横幅，同一时刻只显示一种
#[derive(Debug, Clone, PartialEq)]
pub enum Banner {
    Idle,
    Loading,
    Error(String),
    Success { message: String, shown_at: Instant },
}

/// 一次操作的结果，具体提示保存在控制器状态中
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// 本地校验失败，没有发出请求
    Invalid,
    /// 权限不足，没有发出请求
    Denied,
    /// 请求失败
    Failed,
    /// 响应已过期（之后又发起了新的加载），结果被丢弃
    Superseded,
}

impl ActionOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, ActionOutcome::Done)
    }
}

struct ListState<T> {
    records: Vec<T>,
    banner: Banner,
    form: FormController,
    options: BTreeMap<&'static str, Vec<FieldOption>>,
    pending_delete: Option<i64>,
}

/// 渲染用的状态快照
#[derive(Debug, Clone)]
pub struct ListView<T> {
    pub records: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    pub form: Option<FormState>,
    pub options: BTreeMap<&'static str, Vec<FieldOption>>,
    pub pending_delete: Option<i64>,
}

pub struct ResourceListController<R: Resource> {
    resource: Arc<R>,
    client: ApiClient,
    session: Arc<SessionStore>,
    gate: PermissionGate,
    upload: UploadConfig,
    success_ttl: Duration,
    state: RwLock<ListState<R::Record>>,
    // 最近一次发起的加载序号
    latest_load: AtomicU64,
}

impl<R: Resource> ResourceListController<R> {
    pub fn new(
        resource: R,
        client: ApiClient,
        session: Arc<SessionStore>,
        config: &AppConfig,
    ) -> Self {
        let form = FormController::new(resource.schema());
        Self {
            resource: Arc::new(resource),
            client,
            session,
            gate: PermissionGate::new(&config.permissions),
            upload: config.upload.clone(),
            success_ttl: Duration::from_millis(config.ui.success_banner_ttl_ms),
            state: RwLock::new(ListState {
                records: Vec::new(),
                banner: Banner::Idle,
                form,
                options: BTreeMap::new(),
                pending_delete: None,
            }),
            latest_load: AtomicU64::new(0),
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// 当前用户能否增删改
    pub fn can_mutate(&self) -> bool {
        !R::READ_ONLY && self.gate.allows(self.session.current().as_ref())
    }

    /// 面向用户的错误提示：服务端消息优先，其余情况使用兜底提示
    fn user_message(&self, err: &ConsoleError) -> String {
        match err {
            ConsoleError::Server(msg)
            | ConsoleError::Transport(msg)
            | ConsoleError::Validation(msg)
            | ConsoleError::Permission(msg)
            | ConsoleError::Authentication(msg)
            | ConsoleError::NotFound(msg) => msg.clone(),
            other => {
                warn!("[{}] unexpected error: {}", R::NAME, other);
                self.client.fallback_message().to_string()
            }
        }
    }

    async fn deny(&self) -> ActionOutcome {
        warn!("[{}] mutation rejected by permission gate", R::NAME);
        self.state.write().await.banner = Banner::Error(PERMISSION_DENIED.to_string());
        ActionOutcome::Denied
    }

    /// 首次打开页面：同时加载列表与参考数据
    pub async fn mount(&self) -> ActionOutcome {
        let (outcome, references) =
            tokio::join!(self.load(), self.resource.load_references(&self.client));
        match references {
            Ok(()) => outcome,
            Err(e) => {
                warn!("[{}] failed to load reference data: {}", R::NAME, e);
                self.state.write().await.banner = Banner::Error(self.user_message(&e));
                ActionOutcome::Failed
            }
        }
    }

    pub async fn load(&self) -> ActionOutcome {
        self.load_with(None).await
    }

    /// 重新获取整个集合；成功后可显示一条成功提示
    pub async fn load_with(&self, success: Option<&str>) -> ActionOutcome {
        let seq = self.latest_load.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().await.banner = Banner::Loading;
        debug!("[{}] load #{} started", R::NAME, seq);

        let result = self.resource.fetch(&self.client).await;

        let mut state = self.state.write().await;
        // 在持锁状态下比较，保证只有最新一次加载能写入
        if self.latest_load.load(Ordering::SeqCst) != seq {
            debug!("[{}] load #{} superseded, response discarded", R::NAME, seq);
            return ActionOutcome::Superseded;
        }

        match result {
            Ok(records) => {
                debug!("[{}] load #{} returned {} records", R::NAME, seq, records.len());
                state.records = records;
                state.banner = match success {
                    Some(message) => Banner::Success {
                        message: message.to_string(),
                        shown_at: Instant::now(),
                    },
                    None => Banner::Idle,
                };
                ActionOutcome::Done
            }
            Err(e) => {
                state.banner = Banner::Error(self.user_message(&e));
                ActionOutcome::Failed
            }
        }
    }

    pub async fn begin_create(&self) -> ActionOutcome {
        if !self.can_mutate() {
            return self.deny().await;
        }
        let mut state = self.state.write().await;
        state.form.open(FormMode::Create, FormDraft::new());
        state.options.clear();
        state.banner = Banner::Idle;
        ActionOutcome::Done
    }

    /// 按记录 ID 打开编辑表单，并为已填的父字段准备依赖字段的可选项
    pub async fn begin_edit(&self, id: i64) -> ActionOutcome {
        if !self.can_mutate() {
            return self.deny().await;
        }

        let draft = {
            let mut state = self.state.write().await;
            let found = state
                .records
                .iter()
                .find(|r| R::record_id(r) == id)
                .map(|r| self.resource.draft_from(r));
            let Some(draft) = found else {
                state.banner = Banner::Error(NOT_FOUND.to_string());
                return ActionOutcome::Invalid;
            };
            state.form.open(FormMode::Edit(id), draft.clone());
            state.options.clear();
            state.banner = Banner::Idle;
            draft
        };

        // 编辑时保留原有选择，不自动选中第一项
        for field in self.resource.schema() {
            let Some(parent) = field.depends_on else {
                continue;
            };
            if draft.value(parent).is_none() {
                continue;
            }
            match self
                .resource
                .refresh_options(&self.client, field.name, &draft)
                .await
            {
                Ok(options) => {
                    self.state.write().await.options.insert(field.name, options);
                }
                Err(e) => {
                    let message = self.user_message(&e);
                    self.state.write().await.form.fail(ValidationError::form(message));
                    return ActionOutcome::Failed;
                }
            }
        }
        ActionOutcome::Done
    }

    /// 修改草稿中的一个字段
    ///
    /// 父字段的值变化时，依赖字段被清空，随后重新获取其可选项并自动选中第一项。
    pub async fn set_field(&self, name: &str, value: &str) -> ActionOutcome {
        let (dependents, draft) = {
            let mut state = self.state.write().await;
            match state.form.set_field(name, value) {
                Ok(cleared) => {
                    for field in &cleared {
                        state.options.remove(field);
                    }
                    let draft = state.form.draft().cloned().unwrap_or_default();
                    (cleared, draft)
                }
                Err(e) => {
                    state.form.fail(e);
                    return ActionOutcome::Invalid;
                }
            }
        };

        for dependent in dependents {
            let result = self
                .resource
                .refresh_options(&self.client, dependent, &draft)
                .await;

            let mut state = self.state.write().await;
            // 等待期间父字段又被修改过，结果作废
            if state.form.draft().map(|d| d.get(name)) != Some(value) {
                debug!("[{}] options for '{}' are stale, dropped", R::NAME, dependent);
                return ActionOutcome::Superseded;
            }
            match result {
                Ok(options) => {
                    if let Some(first) = options.first() {
                        state.form.assign(dependent, &first.value);
                    }
                    state.options.insert(dependent, options);
                }
                Err(e) => {
                    let message = self.user_message(&e);
                    state.form.fail(ValidationError::form(message));
                    return ActionOutcome::Failed;
                }
            }
        }
        ActionOutcome::Done
    }

    /// 在草稿上附加一个已经读入内存的文件
    pub async fn attach_file(&self, attachment: Attachment) -> ActionOutcome {
        let mut state = self.state.write().await;
        if !R::ACCEPTS_ATTACHMENT {
            state
                .form
                .fail(ValidationError::field("attachment", "This form does not accept files"));
            return ActionOutcome::Invalid;
        }
        match state.form.attach(Some(attachment)) {
            Ok(()) => ActionOutcome::Done,
            Err(e) => {
                state.form.fail(e);
                ActionOutcome::Invalid
            }
        }
    }

    /// 读取本地文件并附加，先做扩展名、大小与文件头检查
    pub async fn attach_path(&self, path: impl AsRef<Path>) -> ActionOutcome {
        match Attachment::from_path(path, &self.upload) {
            Ok(attachment) => self.attach_file(attachment).await,
            Err(e) => {
                self.state
                    .write()
                    .await
                    .form
                    .fail(ValidationError::field("attachment", e.message()));
                ActionOutcome::Invalid
            }
        }
    }

    pub async fn detach_file(&self) -> ActionOutcome {
        let mut state = self.state.write().await;
        match state.form.attach(None) {
            Ok(()) => ActionOutcome::Done,
            Err(e) => {
                state.form.fail(e);
                ActionOutcome::Invalid
            }
        }
    }

    /// 取消编辑：丢弃草稿与错误
    pub async fn cancel(&self) {
        let mut state = self.state.write().await;
        state.form.cancel();
        state.options.clear();
    }

    /// 提交表单：新建用 POST，编辑用 PUT `{endpoint}/{id}`
    pub async fn submit(&self) -> ActionOutcome {
        if !self.can_mutate() {
            return self.deny().await;
        }

        let (mode, body) = {
            let mut state = self.state.write().await;
            let Some(form_state) = state.form.state() else {
                state.banner = Banner::Error("No form is open".to_string());
                return ActionOutcome::Invalid;
            };
            let mode = form_state.mode;
            let draft = form_state.draft.clone();

            let checked = state
                .form
                .validate()
                .and_then(|()| self.resource.validate(&draft));
            if let Err(e) = checked {
                debug!("[{}] draft rejected: {}", R::NAME, e);
                state.form.fail(e);
                return ActionOutcome::Invalid;
            }

            let user = match self.session.require_user() {
                Ok(user) => user,
                Err(e) => {
                    state.form.fail(ValidationError::form(e.message()));
                    return ActionOutcome::Denied;
                }
            };
            let body = match self.resource.payload(&draft, &user) {
                Ok(body) => body,
                Err(e) => {
                    state.form.fail(ValidationError::form(self.user_message(&e)));
                    return ActionOutcome::Invalid;
                }
            };
            state.form.clear_error();
            (mode, body)
        };

        let endpoint = self.resource.endpoint();
        let (result, message) = match mode {
            FormMode::Create => (
                self.client.execute(Method::Post, endpoint, body).await,
                CREATED,
            ),
            FormMode::Edit(id) => (
                self.client
                    .execute(Method::Put, &format!("{endpoint}/{id}"), body)
                    .await,
                UPDATED,
            ),
        };

        match result {
            Ok(()) => {
                info!("[{}] {:?} succeeded", R::NAME, mode);
                {
                    let mut state = self.state.write().await;
                    state.form.close();
                    state.options.clear();
                }
                self.load_with(Some(message)).await;
                ActionOutcome::Done
            }
            Err(e) => {
                let message = self.user_message(&e);
                self.state
                    .write()
                    .await
                    .form
                    .fail(ValidationError::form(message));
                ActionOutcome::Failed
            }
        }
    }

    /// 删除第一步：记录待确认的 ID
    pub async fn request_delete(&self, id: i64) -> ActionOutcome {
        if !self.can_mutate() {
            return self.deny().await;
        }
        let mut state = self.state.write().await;
        if !state.records.iter().any(|r| R::record_id(r) == id) {
            state.banner = Banner::Error(NOT_FOUND.to_string());
            return ActionOutcome::Invalid;
        }
        state.pending_delete = Some(id);
        ActionOutcome::Done
    }

    pub async fn cancel_delete(&self) {
        self.state.write().await.pending_delete = None;
    }

    /// 删除第二步：发出 DELETE 并重新加载
    pub async fn confirm_delete(&self) -> ActionOutcome {
        if !self.can_mutate() {
            return self.deny().await;
        }
        let Some(id) = self.state.write().await.pending_delete.take() else {
            return ActionOutcome::Invalid;
        };

        let path = format!("{}/{}", self.resource.endpoint(), id);
        match self.client.delete(&path).await {
            Ok(()) => {
                info!("[{}] record {} deleted", R::NAME, id);
                self.load_with(Some(DELETED)).await;
                ActionOutcome::Done
            }
            Err(e) => {
                self.state.write().await.banner = Banner::Error(self.user_message(&e));
                ActionOutcome::Failed
            }
        }
    }

    /// 单条记录详情（GET `{endpoint}/{id}`）
    pub async fn fetch_one(&self, id: i64) -> Option<R::Record> {
        let path = format!("{}/{}", self.resource.endpoint(), id);
        match self.client.get_json(&path).await {
            Ok(record) => Some(record),
            Err(e) => {
                self.state.write().await.banner = Banner::Error(self.user_message(&e));
                None
            }
        }
    }

    pub async fn records(&self) -> Vec<R::Record> {
        self.state.read().await.records.clone()
    }

    /// 渲染快照；成功提示超过显示时长后不再返回
    pub async fn view(&self) -> ListView<R::Record> {
        let state = self.state.read().await;
        let (loading, error, success) = match &state.banner {
            Banner::Idle => (false, None, None),
            Banner::Loading => (true, None, None),
            Banner::Error(message) => (false, Some(message.clone()), None),
            Banner::Success { message, shown_at } => {
                let visible = shown_at.elapsed() < self.success_ttl;
                (false, None, visible.then(|| message.clone()))
            }
        };
        ListView {
            records: state.records.clone(),
            loading,
            error,
            success,
            form: state.form.state().cloned(),
            options: state.options.clone(),
            pending_delete: state.pending_delete,
        }
    }
}
