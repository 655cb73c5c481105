use actix_web::{HttpResponse, web};

use crate::database::models::{
    ChangePasswordInput, CreateUserInput, LoginInput, Role, UpdateUserInput, UserInfo,
};
use crate::database::repositories::UserRepository;
use crate::error::AppError;
use crate::handlers::shared::{created, message, ok};
use crate::services::auth::{AuthService, Claims};

pub async fn login(
    auth_service: web::Data<AuthService>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service.login(input.into_inner()).await?;
    Ok(ok(response))
}

pub async fn me(
    claims: Claims,
    user_repository: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    let user = user_repository
        .find_by_id(claims.user_id())
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| AppError::unauthorized("Account is no longer active"))?;

    Ok(ok(UserInfo::from(user)))
}

pub async fn change_password(
    claims: Claims,
    auth_service: web::Data<AuthService>,
    input: web::Json<ChangePasswordInput>,
) -> Result<HttpResponse, AppError> {
    auth_service
        .change_password(claims.user_id(), input.into_inner())
        .await?;

    Ok(message("Password changed successfully"))
}

pub async fn list_users(
    claims: Claims,
    user_repository: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Admin)?;

    let users = user_repository.list().await?;
    Ok(ok(users))
}

pub async fn create_user(
    claims: Claims,
    auth_service: web::Data<AuthService>,
    input: web::Json<CreateUserInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Admin)?;

    let user = auth_service.create_user(input.into_inner()).await?;
    Ok(created(user))
}

pub async fn update_user(
    claims: Claims,
    user_repository: web::Data<UserRepository>,
    path: web::Path<i64>,
    input: web::Json<UpdateUserInput>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    if input.is_active == Some(false) {
        forbid_self_action(&claims, user_id, "deactivate")?;
    }
    claims.require(Role::Admin)?;

    let user = user_repository
        .update_user(user_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(ok(user))
}

pub async fn delete_user(
    claims: Claims,
    user_repository: web::Data<UserRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    forbid_self_action(&claims, user_id, "delete")?;
    claims.require(Role::Admin)?;

    if !user_repository.delete_user(user_id).await? {
        return Err(AppError::not_found("User not found"));
    }

    log::info!("User {} deleted by {}", user_id, claims.username);
    Ok(message("User deleted successfully"))
}

pub async fn toggle_user(
    claims: Claims,
    user_repository: web::Data<UserRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    forbid_self_action(&claims, user_id, "deactivate")?;
    claims.require(Role::Admin)?;

    let user = user_repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let user = user_repository
        .set_active(user_id, !user.is_active)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    log::info!(
        "User {} {} by {}",
        user.username,
        if user.is_active { "activated" } else { "deactivated" },
        claims.username
    );
    Ok(ok(user))
}

/// Operators may never delete or deactivate their own account, whatever their role.
fn forbid_self_action(claims: &Claims, target_id: i64, action: &str) -> Result<(), AppError> {
    if claims.user_id() == target_id {
        return Err(AppError::forbidden(format!(
            "You cannot {} your own account",
            action
        )));
    }
    Ok(())
}
