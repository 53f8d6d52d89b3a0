//! 账号相关操作：登录、退出、改密码、找回密码与个人资料

pub mod login;
pub mod logout;
pub mod password;
pub mod profile;

use std::path::Path;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::{AppConfig, UploadConfig};
use crate::errors::Result;
use crate::models::auth::SessionUser;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::session::SessionStore;
use crate::shell::routes::Route;

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const CHANGE_PASSWORD_ENDPOINT: &str = "/auth/change-password";
pub const FORGOT_PASSWORD_ENDPOINT: &str = "/auth/forgot-password";
pub const PROFILE_ENDPOINT: &str = "/auth/profile";
pub const AVATAR_ENDPOINT: &str = "/auth/profile/avatar";

pub struct AuthService {
    client: ApiClient,
    session: Arc<SessionStore>,
    upload: UploadConfig,
}

impl AuthService {
    pub fn new(client: ApiClient, session: Arc<SessionStore>, config: &AppConfig) -> Self {
        Self {
            client,
            session,
            upload: config.upload.clone(),
        }
    }

    pub(crate) fn client(&self) -> &ApiClient {
        &self.client
    }

    pub(crate) fn session(&self) -> &SessionStore {
        &self.session
    }

    // 登录并保存会话
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionUser> {
        login::handle_login(self, username, password).await
    }

    // 退出登录，返回应跳转的页面
    pub fn logout(&self) -> Route {
        logout::handle_logout(self)
    }

    // 修改密码
    pub async fn change_password(&self, old: &str, new: &str, confirm: &str) -> Result<()> {
        password::handle_change_password(self, old, new, confirm).await
    }

    // 找回密码
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        password::handle_forgot_password(self, email).await
    }

    // 获取个人资料
    pub async fn profile(&self) -> Result<SessionUser> {
        profile::handle_get_profile(self).await
    }

    // 更新个人资料
    pub async fn update_profile(&self, update: UpdateProfileRequest) -> Result<SessionUser> {
        profile::handle_update_profile(self, update).await
    }

    // 上传头像
    pub async fn upload_avatar(&self, path: impl AsRef<Path>) -> Result<SessionUser> {
        profile::handle_upload_avatar(self, path.as_ref(), &self.upload).await
    }
}
