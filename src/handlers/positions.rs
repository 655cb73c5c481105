use actix_web::{HttpResponse, web};

use crate::database::models::{PositionInput, Role};
use crate::database::repositories::PositionRepository;
use crate::error::AppError;
use crate::handlers::shared::{created, message, ok};
use crate::services::auth::Claims;

pub async fn list_positions(
    _claims: Claims,
    repo: web::Data<PositionRepository>,
) -> Result<HttpResponse, AppError> {
    let positions = repo.list().await?;
    Ok(ok(positions))
}

pub async fn get_position(
    _claims: Claims,
    repo: web::Data<PositionRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let position = repo
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Position not found"))?;

    Ok(ok(position))
}

pub async fn create_position(
    claims: Claims,
    repo: web::Data<PositionRepository>,
    input: web::Json<PositionInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;
    input.validate()?;

    let position = repo.create(&input).await?;
    Ok(created(position))
}

pub async fn update_position(
    claims: Claims,
    repo: web::Data<PositionRepository>,
    path: web::Path<i64>,
    input: web::Json<PositionInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;
    input.validate()?;

    let position = repo
        .update(path.into_inner(), &input)
        .await?
        .ok_or_else(|| AppError::not_found("Position not found"))?;

    Ok(ok(position))
}

pub async fn delete_position(
    claims: Claims,
    repo: web::Data<PositionRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;

    let position_id = path.into_inner();
    if !repo.delete(position_id).await? {
        return Err(AppError::not_found("Position not found"));
    }

    log::info!("Position {} deleted by {}", position_id, claims.username);
    Ok(message("Position deleted successfully"))
}
