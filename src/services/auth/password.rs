use tracing::info;

use super::{AuthService, CHANGE_PASSWORD_ENDPOINT, FORGOT_PASSWORD_ENDPOINT};
use crate::client::{Method, RequestBody};
use crate::errors::{Result, ValidationError};
use crate::models::auth::requests::{ChangePasswordRequest, ForgotPasswordRequest};
use crate::utils::validate::{validate_email, validate_password};

pub async fn handle_change_password(
    service: &AuthService,
    old_password: &str,
    new_password: &str,
    confirm: &str,
) -> Result<()> {
    let user = service.session().require_user()?;

    if old_password.is_empty() {
        return Err(ValidationError::field("old_password", "is required").into());
    }
    if new_password != confirm {
        return Err(ValidationError::field("confirm_password", "does not match").into());
    }
    let policy = validate_password(new_password);
    if !policy.is_valid {
        return Err(ValidationError::field("new_password", policy.error_message()).into());
    }

    let request = ChangePasswordRequest {
        old_password: old_password.to_string(),
        new_password: new_password.to_string(),
    };
    service
        .client()
        .execute(
            Method::Post,
            CHANGE_PASSWORD_ENDPOINT,
            RequestBody::json(&request)?,
        )
        .await?;

    info!("User {} changed password", user.id);
    Ok(())
}

pub async fn handle_forgot_password(service: &AuthService, email: &str) -> Result<()> {
    let email = email.trim();
    validate_email(email).map_err(|msg| ValidationError::field("email", msg))?;

    let request = ForgotPasswordRequest {
        email: email.to_string(),
    };
    service
        .client()
        .execute(
            Method::Post,
            FORGOT_PASSWORD_ENDPOINT,
            RequestBody::json(&request)?,
        )
        .await?;

    info!("Password reset requested");
    Ok(())
}
