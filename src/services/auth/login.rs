use tracing::info;

use super::{AuthService, LOGIN_ENDPOINT};
use crate::errors::{ConsoleError, Result};
use crate::models::auth::SessionUser;
use crate::models::auth::requests::LoginRequest;
use crate::models::auth::responses::LoginResponse;

pub async fn handle_login(
    service: &AuthService,
    username: &str,
    password: &str,
) -> Result<SessionUser> {
    // 1. 本地检查必填项
    if username.trim().is_empty() || password.is_empty() {
        return Err(ConsoleError::validation(
            "Username and password are required",
        ));
    }

    // 2. 请求登录
    let request = LoginRequest {
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    let response: LoginResponse = service.client().post_json(LOGIN_ENDPOINT, &request).await?;

    // 3. 保存令牌与用户
    service.session().set(response.user.clone(), &response.token)?;
    info!("User {} logged in successfully", response.user.id);

    Ok(response.user)
}
