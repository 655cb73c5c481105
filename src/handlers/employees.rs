use actix_web::{HttpResponse, web};

use crate::database::models::{
    EmployeeInput, EmployeeListQuery, EmployeeSearchQuery, EmployeeStatus, Role,
};
use crate::database::repositories::{EmployeeRepository, PositionRepository, SalaryRepository};
use crate::error::AppError;
use crate::handlers::shared::{created, message, ok};
use crate::services::auth::Claims;

const SALARY_RECORDS_EXIST: &str = "Employee has salary records and cannot be deleted";

pub async fn list_employees(
    _claims: Claims,
    repo: web::Data<EmployeeRepository>,
    query: web::Query<EmployeeListQuery>,
) -> Result<HttpResponse, AppError> {
    let employees = repo.list(query.status).await?;
    Ok(ok(employees))
}

pub async fn search_employees(
    _claims: Claims,
    repo: web::Data<EmployeeRepository>,
    query: web::Query<EmployeeSearchQuery>,
) -> Result<HttpResponse, AppError> {
    let employees = repo.search(&query.q).await?;
    Ok(ok(employees))
}

pub async fn list_by_status(
    _claims: Claims,
    repo: web::Data<EmployeeRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let status: EmployeeStatus = path
        .parse()
        .map_err(|_| AppError::bad_request("Status must be active or inactive"))?;

    let employees = repo.list(Some(status)).await?;
    Ok(ok(employees))
}

pub async fn get_employee(
    _claims: Claims,
    repo: web::Data<EmployeeRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee = repo
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    Ok(ok(employee))
}

pub async fn create_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    positions: web::Data<PositionRepository>,
    input: web::Json<EmployeeInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;
    input.validate()?;
    ensure_position_exists(&positions, input.position()).await?;

    let employee = repo.create(&input).await?;
    Ok(created(employee))
}

pub async fn update_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    positions: web::Data<PositionRepository>,
    path: web::Path<i64>,
    input: web::Json<EmployeeInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;
    input.validate()?;
    ensure_position_exists(&positions, input.position()).await?;

    let employee = repo
        .update(path.into_inner(), &input)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    Ok(ok(employee))
}

pub async fn delete_employee(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    salaries: web::Data<SalaryRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;

    let employee_id = path.into_inner();
    if !repo.exists(employee_id).await? {
        return Err(AppError::not_found("Employee not found"));
    }
    if salaries.count_for_employee(employee_id).await? > 0 {
        return Err(AppError::conflict(SALARY_RECORDS_EXIST));
    }

    repo.delete(employee_id)
        .await
        .map_err(|e| AppError::from_delete(e, SALARY_RECORDS_EXIST))?;
    log::info!("Employee {} deleted by {}", employee_id, claims.username);
    Ok(message("Employee deleted successfully"))
}

async fn ensure_position_exists(
    positions: &PositionRepository,
    position_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(id) = position_id {
        if positions.find_by_id(id).await?.is_none() {
            return Err(AppError::bad_request("Position does not exist"));
        }
    }
    Ok(())
}
