use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;

use super::form::FormDraft;
use crate::client::{ApiClient, RequestBody};
use crate::errors::{Result, ValidationError};
use crate::models::auth::SessionUser;

/// 表单字段类型，决定通用格式校验
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Email,
    Phone,
    Date,
    Integer,
    // 引用另一个已加载列表中的记录 ID
    Reference,
    Select(&'static [&'static str]),
}

/// 表单字段定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    // 父字段变化时本字段会被清空并重新获取可选项
    pub depends_on: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            depends_on: None,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            depends_on: None,
        }
    }

    pub const fn depends_on(mut self, parent: &'static str) -> Self {
        self.depends_on = Some(parent);
        self
    }
}

/// 下拉字段的一个可选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

/// 一种远程资源集合的配置
///
/// 通用的 [`ResourceListController`](super::ResourceListController) 通过它得知
/// 端点路径、字段定义、校验规则以及如何把草稿编码成请求体。
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Record: DeserializeOwned + Clone + Send + Sync + fmt::Debug + 'static;

    /// 日志中使用的名称
    const NAME: &'static str;
    /// 只读资源拒绝一切增删改
    const READ_ONLY: bool = false;
    /// 是否允许在草稿上附加文件
    const ACCEPTS_ATTACHMENT: bool = false;

    fn endpoint(&self) -> &str;

    fn schema(&self) -> &'static [FieldSpec];

    fn record_id(record: &Self::Record) -> i64;

    /// 编辑时把记录的可编辑字段拷贝进草稿
    fn draft_from(&self, record: &Self::Record) -> FormDraft;

    /// 字段定义之外的业务规则
    fn validate(&self, _draft: &FormDraft) -> std::result::Result<(), ValidationError> {
        Ok(())
    }

    /// 将通过校验的草稿编码为请求体
    fn payload(&self, draft: &FormDraft, user: &SessionUser) -> Result<RequestBody>;

    /// 获取整个集合
    async fn fetch(&self, client: &ApiClient) -> Result<Vec<Self::Record>> {
        client.get_json(self.endpoint()).await
    }

    /// 编辑前需要的参考数据（例如班级列表）
    async fn load_references(&self, _client: &ApiClient) -> Result<()> {
        Ok(())
    }

    /// 父字段变化后重新获取依赖字段的可选值，返回值按显示顺序排列
    async fn refresh_options(
        &self,
        _client: &ApiClient,
        _field: &str,
        _draft: &FormDraft,
    ) -> Result<Vec<FieldOption>> {
        Ok(Vec::new())
    }
}
