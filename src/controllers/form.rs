//! 表单子控制器：持有单个草稿记录及其字段输入处理

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::resource::{FieldKind, FieldSpec};
use crate::errors::ValidationError;
use crate::models::files::Attachment;
use crate::utils::role::fold_key;
use crate::utils::validate::{validate_email, validate_phone};

/// 尚未保存的表单状态
///
/// 所有字段都以用户输入的字符串形式保存，提交时再按字段类型解析。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    values: BTreeMap<String, String>,
    attachment: Option<Attachment>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 构造草稿用的链式写法
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn clear(&mut self, name: &str) {
        self.values.remove(name);
    }

    /// 原始输入，缺失时为空串
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// 去掉首尾空白后的非空值
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn text(&self, name: &str) -> String {
        self.value(name).unwrap_or("").to_string()
    }

    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.value(name).map(str::to_string)
    }

    pub fn int(&self, name: &str) -> Result<i64, ValidationError> {
        let raw = self
            .value(name)
            .ok_or_else(|| ValidationError::field(name, "is required"))?;
        raw.parse()
            .map_err(|_| ValidationError::field(name, "must be a number"))
    }

    pub fn opt_int(&self, name: &str) -> Result<Option<i64>, ValidationError> {
        match self.value(name) {
            None => Ok(None),
            Some(_) => self.int(name).map(Some),
        }
    }

    pub fn date(&self, name: &str) -> Result<NaiveDate, ValidationError> {
        let raw = self
            .value(name)
            .ok_or_else(|| ValidationError::field(name, "is required"))?;
        crate::utils::parse_date(raw).map_err(|msg| ValidationError::field(name, msg))
    }

    pub fn opt_date(&self, name: &str) -> Result<Option<NaiveDate>, ValidationError> {
        match self.value(name) {
            None => Ok(None),
            Some(_) => self.date(name).map(Some),
        }
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn set_attachment(&mut self, attachment: Option<Attachment>) {
        self.attachment = attachment;
    }
}

/// 按字段定义做必填与格式校验，遇到第一个错误即返回
pub fn validate_schema(schema: &[FieldSpec], draft: &FormDraft) -> Result<(), ValidationError> {
    for field in schema {
        let Some(value) = draft.value(field.name) else {
            if field.required {
                return Err(ValidationError::field(field.name, "is required"));
            }
            continue;
        };

        let checked = match field.kind {
            FieldKind::Text | FieldKind::Multiline => Ok(()),
            FieldKind::Email => validate_email(value),
            FieldKind::Phone => validate_phone(value),
            FieldKind::Date => crate::utils::parse_date(value).map(|_| ()),
            FieldKind::Integer | FieldKind::Reference => value
                .parse::<i64>()
                .map(|_| ())
                .map_err(|_| "must be a number"),
            FieldKind::Select(options) => {
                let key = fold_key(value);
                if options.iter().any(|option| fold_key(option) == key) {
                    Ok(())
                } else {
                    Err("is not one of the allowed options")
                }
            }
        };
        checked.map_err(|msg| ValidationError::field(field.name, msg))?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    // 以记录 ID 而不是下标定位
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub mode: FormMode,
    pub draft: FormDraft,
    pub error: Option<ValidationError>,
}

/// 表单子控制器
#[derive(Debug)]
pub struct FormController {
    schema: &'static [FieldSpec],
    state: Option<FormState>,
}

impl FormController {
    pub fn new(schema: &'static [FieldSpec]) -> Self {
        Self {
            schema,
            state: None,
        }
    }

    pub fn open(&mut self, mode: FormMode, draft: FormDraft) {
        self.state = Some(FormState {
            mode,
            draft,
            error: None,
        });
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&FormState> {
        self.state.as_ref()
    }

    pub fn draft(&self) -> Option<&FormDraft> {
        self.state.as_ref().map(|s| &s.draft)
    }

    /// 修改一个字段；值发生变化时清空依赖它的字段并返回这些字段名
    pub fn set_field(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<Vec<&'static str>, ValidationError> {
        if !self.schema.iter().any(|f| f.name == name) {
            return Err(ValidationError::field(name, "is not a field of this form"));
        }
        let Some(state) = self.state.as_mut() else {
            return Err(ValidationError::form("No form is open"));
        };

        let changed = state.draft.get(name) != value;
        state.draft.set(name, value);
        if !changed {
            return Ok(Vec::new());
        }

        let dependents: Vec<&'static str> = self
            .schema
            .iter()
            .filter(|f| f.depends_on == Some(name))
            .map(|f| f.name)
            .collect();
        for dependent in &dependents {
            state.draft.clear(dependent);
        }
        Ok(dependents)
    }

    /// 直接写入字段值，不触发依赖清理（用于自动选择）
    pub fn assign(&mut self, name: &str, value: &str) {
        if let Some(state) = self.state.as_mut() {
            state.draft.set(name, value);
        }
    }

    pub fn attach(&mut self, attachment: Option<Attachment>) -> Result<(), ValidationError> {
        let Some(state) = self.state.as_mut() else {
            return Err(ValidationError::form("No form is open"));
        };
        state.draft.set_attachment(attachment);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.state {
            Some(state) => validate_schema(self.schema, &state.draft),
            None => Err(ValidationError::form("No form is open")),
        }
    }

    pub fn fail(&mut self, error: ValidationError) {
        if let Some(state) = self.state.as_mut() {
            state.error = Some(error);
        }
    }

    pub fn clear_error(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.error = None;
        }
    }

    /// 取消：丢弃草稿与错误并关闭表单
    pub fn cancel(&mut self) {
        self.state = None;
    }

    pub fn close(&mut self) -> Option<FormState> {
        self.state.take()
    }
}
