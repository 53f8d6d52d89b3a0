//! 路由表与登录拦截

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    ForgotPassword,
    ChangePassword,
    Dashboard,
    Classes,
    Students,
    Officers,
    Tasks,
    TaskDetail(i64),
    Notifications,
    Profile,
    Reports,
    Chat,
}

impl Route {
    /// 解析路径，未知路径回落到首页
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["login"] => Route::Login,
            ["forgot-password"] => Route::ForgotPassword,
            ["change-password"] => Route::ChangePassword,
            [] | ["dashboard"] => Route::Dashboard,
            ["classes"] => Route::Classes,
            ["students"] => Route::Students,
            ["officers"] | ["class-officers"] => Route::Officers,
            ["tasks"] => Route::Tasks,
            ["tasks", id] => id
                .parse()
                .map(Route::TaskDetail)
                .unwrap_or(Route::Tasks),
            ["notifications"] => Route::Notifications,
            ["profile"] => Route::Profile,
            ["reports"] => Route::Reports,
            ["chat"] => Route::Chat,
            _ => Route::Dashboard,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::ChangePassword => "/change-password".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Classes => "/classes".to_string(),
            Route::Students => "/students".to_string(),
            Route::Officers => "/officers".to_string(),
            Route::Tasks => "/tasks".to_string(),
            Route::TaskDetail(id) => format!("/tasks/{id}"),
            Route::Notifications => "/notifications".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Reports => "/reports".to_string(),
            Route::Chat => "/chat".to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::ForgotPassword => "Forgot password",
            Route::ChangePassword => "Change password",
            Route::Dashboard => "Dashboard",
            Route::Classes => "Classes",
            Route::Students => "Students",
            Route::Officers => "Class officers",
            Route::Tasks => "Tasks",
            Route::TaskDetail(_) => "Task detail",
            Route::Notifications => "Notifications",
            Route::Profile => "Profile",
            Route::Reports => "Reports",
            Route::Chat => "Assistant",
        }
    }

    /// 无需登录即可访问
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::ForgotPassword | Route::ChangePassword
        )
    }

    /// 侧边栏菜单项，按显示顺序
    pub fn sidebar() -> &'static [Route] {
        &[
            Route::Dashboard,
            Route::Classes,
            Route::Students,
            Route::Officers,
            Route::Tasks,
            Route::Notifications,
            Route::Reports,
            Route::Chat,
            Route::Profile,
        ]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// 未登录时除公开页面外一律跳转登录页
pub fn guard(route: Route, authenticated: bool) -> Route {
    if authenticated || route.is_public() {
        route
    } else {
        Route::Login
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/classes"), Route::Classes);
        assert_eq!(Route::parse("classes/"), Route::Classes);
        assert_eq!(Route::parse("/tasks/42"), Route::TaskDetail(42));
        assert_eq!(Route::parse("/tasks/abc"), Route::Tasks);
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("/nowhere"), Route::Dashboard);
        assert_eq!(Route::parse("/class-officers"), Route::Officers);
    }

    #[test]
    fn test_path_roundtrip_for_sidebar() {
        for route in Route::sidebar() {
            assert_eq!(Route::parse(&route.path()), *route);
        }
    }

    #[test]
    fn test_guard() {
        assert_eq!(guard(Route::Classes, false), Route::Login);
        assert_eq!(guard(Route::TaskDetail(1), false), Route::Login);
        assert_eq!(guard(Route::Classes, true), Route::Classes);
        assert_eq!(guard(Route::ForgotPassword, false), Route::ForgotPassword);
        assert_eq!(guard(Route::ChangePassword, false), Route::ChangePassword);
        assert_eq!(guard(Route::Login, false), Route::Login);
    }
}
