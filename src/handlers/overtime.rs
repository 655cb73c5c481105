use actix_web::{HttpResponse, web};

use crate::config::Config;
use crate::database::models::{
    ApprovalInput, OvertimeInput, OvertimeUpdateInput, PeriodQuery, Role,
};
use crate::database::repositories::OvertimeRepository;
use crate::database::types::Period;
use crate::error::AppError;
use crate::handlers::shared::{created, message, ok};
use crate::services::OvertimeService;
use crate::services::auth::Claims;

pub async fn list_overtime(
    _claims: Claims,
    repo: web::Data<OvertimeRepository>,
) -> Result<HttpResponse, AppError> {
    let rows = repo.list().await?;
    Ok(ok(rows))
}

pub async fn list_overtime_by_period(
    _claims: Claims,
    repo: web::Data<OvertimeRepository>,
    config: web::Data<Config>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let period = Period::new(query.month, query.year, config.period_bounds())?;

    let rows = repo
        .list_by_range(period.first_day(), period.last_day())
        .await?;
    Ok(ok(rows))
}

pub async fn list_employee_overtime(
    _claims: Claims,
    repo: web::Data<OvertimeRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let rows = repo.list_by_employee(path.into_inner()).await?;
    Ok(ok(rows))
}

pub async fn get_overtime(
    _claims: Claims,
    repo: web::Data<OvertimeRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let overtime = repo
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Overtime not found"))?;

    Ok(ok(overtime))
}

pub async fn create_overtime(
    claims: Claims,
    service: web::Data<OvertimeService>,
    input: web::Json<OvertimeInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;

    let overtime = service.create(input.into_inner()).await?;
    Ok(created(overtime))
}

pub async fn update_overtime(
    claims: Claims,
    service: web::Data<OvertimeService>,
    path: web::Path<i64>,
    input: web::Json<OvertimeUpdateInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;

    let overtime = service.update(path.into_inner(), input.into_inner()).await?;
    Ok(ok(overtime))
}

pub async fn delete_overtime(
    claims: Claims,
    repo: web::Data<OvertimeRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;

    if !repo.delete(path.into_inner()).await? {
        return Err(AppError::not_found("Overtime not found"));
    }

    Ok(message("Overtime deleted successfully"))
}

pub async fn approve_overtime(
    claims: Claims,
    service: web::Data<OvertimeService>,
    path: web::Path<i64>,
    input: web::Json<ApprovalInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;

    let overtime = service.approve(path.into_inner(), input.into_inner()).await?;
    Ok(ok(overtime))
}

pub async fn recalculate_rates(
    claims: Claims,
    service: web::Data<OvertimeService>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;

    let result = service.backfill_rates().await?;
    Ok(ok(result))
}
