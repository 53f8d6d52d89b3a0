//! 导航外壳：路由拦截、侧边栏 / 导航栏 / 页脚组合，以及命令分发

use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use super::commands::{Command, HELP};
use super::render::TableRow;
use super::routes::{Route, guard};
use super::screen::ListScreen;
use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::controllers::{ActionOutcome, ResourceListController};
use crate::errors::{ConsoleError, Result};
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::notifications::Notification;
use crate::models::reports::ExportFormat;
use crate::models::tasks::Task;
use crate::resources::notifications::latest;
use crate::resources::{
    ClassResource, NotificationResource, OfficerResource, StudentResource, TaskResource,
};
use crate::services::{AuthService, ChatService, ReportService};
use crate::session::SessionStore;

/// 命令执行后是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navbar {
    pub display_name: Option<String>,
    pub has_new: bool,
}

pub struct NavigationShell {
    config: AppConfig,
    session: Arc<SessionStore>,
    client: ApiClient,
    route: Route,
    classes: ResourceListController<ClassResource>,
    students: ResourceListController<StudentResource>,
    officers: ResourceListController<OfficerResource>,
    tasks: ResourceListController<TaskResource>,
    notifications: ResourceListController<NotificationResource>,
    auth: AuthService,
    reports: ReportService,
    chat: ChatService,
    // 最近一次获取的最新通知，以及已读标记（只在内存中）
    latest: Vec<Notification>,
    last_seen: Option<i64>,
    // 详情页的任务，跳转时获取
    detail: Option<Task>,
}

impl NavigationShell {
    pub fn new(config: AppConfig, session: Arc<SessionStore>, client: ApiClient) -> Self {
        let classes =
            ResourceListController::new(ClassResource, client.clone(), session.clone(), &config);
        let students =
            ResourceListController::new(StudentResource, client.clone(), session.clone(), &config);
        let officers = ResourceListController::new(
            OfficerResource::new(),
            client.clone(),
            session.clone(),
            &config,
        );
        let tasks = ResourceListController::new(
            TaskResource::new(),
            client.clone(),
            session.clone(),
            &config,
        );
        let notifications = ResourceListController::new(
            NotificationResource::new(),
            client.clone(),
            session.clone(),
            &config,
        );

        Self {
            auth: AuthService::new(client.clone(), session.clone(), &config),
            reports: ReportService::new(client.clone(), &config),
            chat: ChatService::new(client.clone()),
            classes,
            students,
            officers,
            tasks,
            notifications,
            route: guard(Route::Dashboard, session.is_authenticated()),
            latest: Vec::new(),
            last_seen: None,
            detail: None,
            config,
            session,
            client,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn officers(&self) -> &ResourceListController<OfficerResource> {
        &self.officers
    }

    /// 当前路由对应的列表页面
    pub fn screen(&self) -> Option<&dyn ListScreen> {
        match self.route {
            Route::Classes => Some(&self.classes),
            Route::Students => Some(&self.students),
            Route::Officers => Some(&self.officers),
            Route::Tasks | Route::TaskDetail(_) => Some(&self.tasks),
            Route::Notifications => Some(&self.notifications),
            _ => None,
        }
    }

    /// 跳转；未登录访问受保护页面时改为登录页
    ///
    /// 页面加载只在这里发生：列表与参考数据、任务详情、最新通知。
    /// 之后的命令只使用缓存，不会再次请求。
    pub async fn navigate(&mut self, path: &str) -> Route {
        let requested = Route::parse(path);
        let target = guard(requested, self.session.is_authenticated());
        if target != requested {
            debug!("Route {} requires login, redirecting", requested);
        }
        self.route = target;
        self.detail = None;
        if let Some(screen) = self.screen() {
            screen.mount().await;
        }
        if let Route::TaskDetail(id) = target {
            self.detail = self.tasks.fetch_one(id).await;
        }
        if self.session.is_authenticated() {
            self.refresh_notifications().await;
        }
        target
    }

    /// 重新获取最新通知；失败时保留上一次的结果
    pub async fn refresh_notifications(&mut self) {
        match latest(&self.client, self.config.ui.latest_notifications).await {
            Ok(items) => self.latest = items,
            Err(e) => warn!("Failed to fetch latest notifications: {}", e),
        }
    }

    pub fn sidebar(&self) -> Vec<(Route, bool)> {
        if !self.session.is_authenticated() {
            return Vec::new();
        }
        Route::sidebar()
            .iter()
            .map(|r| (*r, *r == self.route))
            .collect()
    }

    /// 导航栏：用户名与“有新通知”标记
    pub fn navbar(&self) -> Navbar {
        let Some(user) = self.session.current() else {
            return Navbar {
                display_name: None,
                has_new: false,
            };
        };
        Navbar {
            display_name: Some(user.display_name),
            has_new: has_new(&self.latest, self.last_seen),
        }
    }

    /// 把已获取的最新通知标记为已读
    pub fn mark_seen(&mut self) {
        if let Some(newest) = self.latest.iter().map(|n| n.id).max() {
            self.last_seen = Some(newest);
        }
    }

    pub fn footer(&self) -> String {
        format!(
            "{} v{}",
            self.config.app.system_name,
            env!("CARGO_PKG_VERSION")
        )
    }

    /// 当前页面的完整文本
    pub async fn render(&self) -> String {
        let navbar = self.navbar();
        let mut out = String::new();

        match &navbar.display_name {
            Some(name) => {
                let badge = if navbar.has_new { " [new notifications]" } else { "" };
                let _ = writeln!(out, "{} | {}{}", self.config.app.system_name, name, badge);
                let menu = self
                    .sidebar()
                    .iter()
                    .map(|(route, active)| {
                        if *active {
                            format!("[{}]", route.title())
                        } else {
                            route.title().to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" · ");
                let _ = writeln!(out, "{menu}");
            }
            None => {
                let _ = writeln!(out, "{}", self.config.app.system_name);
            }
        }
        out.push('\n');

        match self.route {
            Route::TaskDetail(id) => out.push_str(&self.render_task(id).await),
            route => match self.screen() {
                Some(screen) => out.push_str(&screen.render(route.title()).await),
                None => out.push_str(&self.render_page(route)),
            },
        }

        let _ = write!(out, "\n-- {} --", self.footer());
        out
    }

    async fn render_task(&self, id: i64) -> String {
        match &self.detail {
            Some(task) => {
                let mut out = format!("== Task #{} ==\n", task.id);
                for (header, cell) in <Task as TableRow>::headers()
                    .iter()
                    .zip(task.cells())
                {
                    let _ = writeln!(out, "{header:>12}: {cell}");
                }
                if let Some(description) = &task.description {
                    let _ = writeln!(out, "\n{description}");
                }
                if let Some(file) = &task.attachment {
                    let _ = writeln!(out, "Attachment: {file}");
                }
                out
            }
            None => {
                let view = self.tasks.view().await;
                format!(
                    "Task #{id} could not be loaded: {}\n",
                    view.error.unwrap_or_default()
                )
            }
        }
    }

    fn render_page(&self, route: Route) -> String {
        let hint = match route {
            Route::Login => "Sign in with: login <username> <password>\nForgot it? open /forgot-password",
            Route::ForgotPassword => "Request a reset link with: forgot <email>",
            Route::ChangePassword => "Change it with: passwd <old> <new> <confirm>",
            Route::Dashboard => "Pick a screen from the menu with: open <path>",
            Route::Profile => "Show with: profile | update with: profile name=.. email=.. phone=.. | avatar <file>",
            Route::Reports => "Statistics: stats | download: export <xlsx|csv|pdf>",
            Route::Chat => "Ask the assistant with: ask <question>",
            _ => "",
        };
        format!("== {} ==\n{hint}\n", route.title())
    }

    /// 执行一条命令，返回要显示的文本
    pub async fn execute(&mut self, command: Command) -> (Flow, String) {
        if command.requires_login() && !self.session.is_authenticated() {
            return (Flow::Continue, "Please log in first.".to_string());
        }

        let output = match command {
            Command::Quit => return (Flow::Quit, "Bye.".to_string()),
            Command::Help => HELP.to_string(),
            Command::Open(path) => {
                self.navigate(&path).await;
                self.render().await
            }
            Command::Login { username, password } => {
                match self.auth.login(&username, &password).await {
                    Ok(user) => {
                        self.navigate("/dashboard").await;
                        format!("Welcome, {}!\n{}", user.display_name, self.render().await)
                    }
                    Err(e) => describe(&e),
                }
            }
            Command::Logout => {
                let target = self.auth.logout();
                self.last_seen = None;
                self.latest.clear();
                self.navigate(&target.path()).await;
                self.render().await
            }
            Command::Seen => {
                self.mark_seen();
                "Notifications marked as read.".to_string()
            }
            Command::Stats => self.report(self.stats().await),
            Command::Export(format) => self.report(self.export(format).await),
            Command::Ask(question) => self.report(
                self.chat
                    .ask(&question)
                    .await
                    .map(|reply| format!("Assistant: {reply}")),
            ),
            Command::Profile => self.report(self.auth.profile().await.map(|u| {
                format!(
                    "{} <{}>\nRole: {}\nAvatar: {}",
                    u.display_name,
                    u.email,
                    u.role,
                    u.avatar.unwrap_or_else(|| "-".to_string())
                )
            })),
            Command::ProfileUpdate(fields) => {
                let result = match profile_request(fields) {
                    Ok(update) => self.auth.update_profile(update).await,
                    Err(e) => Err(e),
                };
                self.report(result.map(|u| format!("Profile updated: {}", u.display_name)))
            }
            Command::Avatar(path) => self.report(
                self.auth
                    .upload_avatar(&path)
                    .await
                    .map(|_| "Avatar updated.".to_string()),
            ),
            Command::Passwd { old, new, confirm } => self.report(
                self.auth
                    .change_password(&old, &new, &confirm)
                    .await
                    .map(|()| "Password changed.".to_string()),
            ),
            Command::Forgot(email) => match self.auth.forgot_password(&email).await {
                Ok(()) => "If the address exists, a reset email has been sent.".to_string(),
                Err(e) => describe(&e),
            },
            Command::Detail(id) => {
                self.navigate(&Route::TaskDetail(id).path()).await;
                self.render().await
            }
            other => return self.execute_on_screen(other).await,
        };
        (Flow::Continue, output)
    }

    async fn execute_on_screen(&mut self, command: Command) -> (Flow, String) {
        let Some(screen) = self.screen() else {
            return (
                Flow::Continue,
                "This command needs a list screen, e.g. open /classes".to_string(),
            );
        };

        let outcome = match command {
            Command::Reload => screen.reload().await,
            Command::New => screen.begin_create().await,
            Command::Edit(id) => screen.begin_edit(id).await,
            Command::Set { field, value } => screen.set_field(&field, &value).await,
            Command::Attach(path) => screen.attach(Path::new(&path)).await,
            Command::Detach => screen.detach().await,
            Command::Submit => screen.submit().await,
            Command::Cancel => {
                screen.cancel().await;
                screen.cancel_delete().await;
                ActionOutcome::Done
            }
            Command::Delete(id) => screen.request_delete(id).await,
            Command::Confirm => screen.confirm_delete().await,
            _ => ActionOutcome::Invalid,
        };
        debug!("Screen command finished with {:?}", outcome);
        // 详情页上的编辑提交后，用重新加载的列表刷新缓存
        if let Route::TaskDetail(id) = self.route
            && let Some(task) = self.tasks.records().await.into_iter().find(|t| t.id == id)
        {
            self.detail = Some(task);
        }
        (Flow::Continue, self.render().await)
    }

    fn report(&self, result: Result<String>) -> String {
        result.unwrap_or_else(|e| describe(&e))
    }

    async fn stats(&self) -> Result<String> {
        let stats = self.reports.statistics().await?;
        let mut out = format!(
            "Classes: {}\nStudents: {}\nTasks: {}\nNotifications: {}\nOfficers: {}\n",
            stats.total_classes,
            stats.total_students,
            stats.total_tasks,
            stats.total_notifications,
            stats.total_officers
        );
        for (key, value) in &stats.extra {
            let _ = writeln!(out, "{key}: {value}");
        }
        Ok(out)
    }

    async fn export(&self, format: ExportFormat) -> Result<String> {
        let file = self.reports.export(format).await?;
        let path = self.reports.save_export(&file)?;
        Ok(format!("Saved {} ({} bytes)", path.display(), file.bytes.len()))
    }
}

/// 最新通知中存在比已读标记更新的条目
pub fn has_new(latest: &[Notification], last_seen: Option<i64>) -> bool {
    match last_seen {
        None => !latest.is_empty(),
        Some(seen) => latest.iter().any(|n| n.id > seen),
    }
}

fn describe(err: &ConsoleError) -> String {
    format!("Error: {}", err.message())
}

fn profile_request(fields: Vec<(String, String)>) -> Result<UpdateProfileRequest> {
    let mut update = UpdateProfileRequest::default();
    for (key, value) in fields {
        match key.as_str() {
            "name" | "display_name" => update.display_name = Some(value),
            "email" => update.email = Some(value),
            "phone" => update.phone = Some(value),
            other => {
                return Err(ConsoleError::validation(format!(
                    "Unknown profile field '{other}'"
                )));
            }
        }
    }
    Ok(update)
}
