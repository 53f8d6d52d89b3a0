//! 纯文本渲染：表格、横幅与表单

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::controllers::{FieldOption, FieldSpec, FormMode, FormState, ListView};
use crate::models::classes::Class;
use crate::models::notifications::Notification;
use crate::models::officers::OfficerAssignment;
use crate::models::students::Student;
use crate::models::tasks::Task;
use crate::utils::DATE_FORMAT;

/// 可以显示为表格一行的记录
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or("-")
        .to_string()
}

impl TableRow for Class {
    fn headers() -> &'static [&'static str] {
        &["ID", "Code", "Name", "Major", "Cohort", "Homeroom teacher"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.class_code.clone(),
            self.name.clone(),
            self.major.clone(),
            self.cohort.clone(),
            or_dash(self.homeroom_teacher.as_deref()),
        ]
    }
}

impl TableRow for Student {
    fn headers() -> &'static [&'static str] {
        &["ID", "Full name", "Email", "Phone", "Role"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name.clone(),
            self.email.clone(),
            or_dash(self.phone.as_deref()),
            or_dash(self.role.as_deref()),
        ]
    }
}

impl TableRow for OfficerAssignment {
    fn headers() -> &'static [&'static str] {
        &["ID", "Class", "Assignee", "Role", "Start", "End"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.class_name
                .clone()
                .unwrap_or_else(|| format!("#{}", self.class_id)),
            self.user_name
                .clone()
                .unwrap_or_else(|| format!("#{}", self.user_id)),
            self.role_title.clone(),
            self.start_date.format(DATE_FORMAT).to_string(),
            self.end_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

impl TableRow for Task {
    fn headers() -> &'static [&'static str] {
        &["ID", "Title", "Due", "Priority", "Class", "Assigned by", "File"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.due_date.format(DATE_FORMAT).to_string(),
            self.priority.to_string(),
            or_dash(self.class_name.as_deref()),
            or_dash(self.assigned_by_name.as_deref()),
            if self.attachment.is_some() { "yes" } else { "-" }.to_string(),
        ]
    }
}

impl TableRow for Notification {
    fn headers() -> &'static [&'static str] {
        &["ID", "Title", "Sent", "Class", "Sender"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.sent_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.class_name
                .clone()
                .unwrap_or_else(|| "All".to_string()),
            or_dash(self.sender_name.as_deref()),
        ]
    }
}

/// 等宽文本表格；按字符数而不是字节数对齐
pub fn render_table<T: TableRow>(rows: &[T]) -> String {
    let headers = T::headers();
    let cells: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| {
                let pad = width.saturating_sub(value.chars().count());
                format!("{value}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    if cells.is_empty() {
        out.push_str("(no records)\n");
    }
    for row in &cells {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

fn render_form(
    out: &mut String,
    form: &FormState,
    schema: &[FieldSpec],
    options: &BTreeMap<&'static str, Vec<FieldOption>>,
) {
    let heading = match form.mode {
        FormMode::Create => "New record".to_string(),
        FormMode::Edit(id) => format!("Editing #{id}"),
    };
    let _ = writeln!(out, "\n[{heading}]");

    for field in schema {
        let marker = if field.required { "*" } else { " " };
        let value = form.draft.get(field.name);
        let _ = writeln!(out, "  {marker}{} ({}): {}", field.label, field.name, value);
        if let Some(choices) = options.get(field.name) {
            let listed = choices
                .iter()
                .map(|o| format!("{}={}", o.value, o.label))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "      options: {listed}");
        }
    }
    if let Some(file) = form.draft.attachment() {
        let _ = writeln!(out, "   attachment: {} ({} bytes)", file.file_name, file.size());
    }
    if let Some(error) = &form.error {
        let _ = writeln!(out, "  ! {error}");
    }
}

/// 一个列表页面的完整文本
pub fn render_list<T: TableRow>(
    title: &str,
    view: &ListView<T>,
    schema: &[FieldSpec],
    can_mutate: bool,
) -> String {
    let mut out = format!("== {title} ==\n");
    if view.loading {
        out.push_str("Loading...\n");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error}");
    }
    if let Some(success) = &view.success {
        let _ = writeln!(out, "OK: {success}");
    }

    out.push_str(&render_table(&view.records));

    if let Some(id) = view.pending_delete {
        let _ = writeln!(out, "Delete record #{id}? Type 'confirm' or 'cancel'.");
    }
    if let Some(form) = &view.form {
        render_form(&mut out, form, schema, &view.options);
    } else if can_mutate {
        out.push_str("Actions: new | edit <id> | delete <id> | reload\n");
    }
    out
}
