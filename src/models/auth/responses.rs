use serde::Deserialize;

use super::entities::SessionUser;

// 登录响应
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    pub user: SessionUser,
}
