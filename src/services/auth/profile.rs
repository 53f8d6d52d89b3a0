use std::path::Path;
use tracing::info;

use super::{AVATAR_ENDPOINT, AuthService, PROFILE_ENDPOINT};
use crate::client::{Method, MultipartForm, RequestBody};
use crate::config::UploadConfig;
use crate::errors::{ConsoleError, Result, ValidationError};
use crate::models::auth::SessionUser;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::files::Attachment;
use crate::utils::validate::{validate_email, validate_phone};

const AVATAR_TYPES: &[&str] = &[".png", ".jpg", ".jpeg"];

pub async fn handle_get_profile(service: &AuthService) -> Result<SessionUser> {
    service.session().require_user()?;
    service.client().get_json(PROFILE_ENDPOINT).await
}

pub async fn handle_update_profile(
    service: &AuthService,
    update: UpdateProfileRequest,
) -> Result<SessionUser> {
    service.session().require_user()?;

    if let Some(name) = &update.display_name
        && name.trim().is_empty()
    {
        return Err(ValidationError::field("display_name", "is required").into());
    }
    if let Some(email) = &update.email {
        validate_email(email).map_err(|msg| ValidationError::field("email", msg))?;
    }
    if let Some(phone) = &update.phone {
        validate_phone(phone).map_err(|msg| ValidationError::field("phone", msg))?;
    }

    service
        .client()
        .execute(Method::Put, PROFILE_ENDPOINT, RequestBody::json(&update)?)
        .await?;

    // 以服务端为准刷新会话中的用户
    let user = handle_get_profile(service).await?;
    service.session().update_user(user.clone())?;
    info!("Profile of user {} updated", user.id);
    Ok(user)
}

pub async fn handle_upload_avatar(
    service: &AuthService,
    path: &Path,
    upload: &UploadConfig,
) -> Result<SessionUser> {
    service.session().require_user()?;

    let avatar_rules = UploadConfig {
        max_size: upload.max_size,
        allowed_types: AVATAR_TYPES.iter().map(|t| t.to_string()).collect(),
    };
    let file = Attachment::from_path(path, &avatar_rules).map_err(|e| match e {
        ConsoleError::Validation(msg) => ValidationError::field("avatar", msg).into(),
        other => other,
    })?;

    let form = MultipartForm::default().with_file("avatar", &file);
    service
        .client()
        .execute(Method::Post, AVATAR_ENDPOINT, RequestBody::Multipart(form))
        .await?;

    let user = handle_get_profile(service).await?;
    service.session().update_user(user.clone())?;
    info!("Avatar of user {} updated", user.id);
    Ok(user)
}
