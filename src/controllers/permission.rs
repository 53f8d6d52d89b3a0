use crate::config::PermissionConfig;
use crate::models::auth::SessionUser;
use crate::utils::{is_privileged_role, normalize_role};

/// 拒绝增删改时显示的固定提示
pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action";

/// 基于角色白名单的写权限判断
#[derive(Debug, Clone)]
pub struct PermissionGate {
    privileged: Vec<String>,
}

impl PermissionGate {
    pub fn new(config: &PermissionConfig) -> Self {
        let privileged = config
            .privileged_roles
            .iter()
            .map(|role| normalize_role(role))
            .filter(|role| !role.is_empty())
            .collect();
        Self { privileged }
    }

    /// 未登录用户一律不允许
    pub fn allows(&self, user: Option<&SessionUser>) -> bool {
        user.is_some_and(|u| is_privileged_role(&u.role, &self.privileged))
    }
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self::new(&PermissionConfig::default())
    }
}
