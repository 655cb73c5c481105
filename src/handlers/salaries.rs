use actix_web::{HttpResponse, web};

use crate::database::models::{
    BatchInput, OptionalPeriodQuery, PeriodQuery, Role, SalaryInput, SalaryStatusInput,
};
use crate::database::repositories::{SalaryRepository, UserRepository};
use crate::database::types::Period;
use crate::error::AppError;
use crate::handlers::shared::{created, message, ok};
use crate::services::PayrollService;
use crate::services::auth::Claims;

pub async fn list_salaries(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;

    let rows = repo.list().await?;
    Ok(ok(rows))
}

pub async fn list_salaries_by_period(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    payroll: web::Data<PayrollService>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;
    let period = payroll.period(query.month, query.year)?;

    let rows = repo.list_by_period(period).await?;
    Ok(ok(rows))
}

pub async fn list_employee_salaries(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;

    let rows = repo.list_by_employee(path.into_inner(), None).await?;
    Ok(ok(rows))
}

pub async fn get_salary(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;

    let salary = repo
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Salary not found"))?;

    Ok(ok(salary))
}

pub async fn create_salary(
    claims: Claims,
    payroll: web::Data<PayrollService>,
    input: web::Json<SalaryInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;

    let salary = payroll.create_salary(input.into_inner()).await?;
    Ok(created(salary))
}

pub async fn update_salary(
    claims: Claims,
    payroll: web::Data<PayrollService>,
    path: web::Path<i64>,
    input: web::Json<SalaryInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;

    let salary = payroll
        .update_salary(path.into_inner(), input.into_inner())
        .await?;
    Ok(ok(salary))
}

pub async fn update_salary_status(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    path: web::Path<i64>,
    input: web::Json<SalaryStatusInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;

    let salary = repo
        .update_status(path.into_inner(), input.status)
        .await?
        .ok_or_else(|| AppError::not_found("Salary not found"))?;

    log::info!(
        "Salary {} marked {} by {}",
        salary.salary.id,
        salary.salary.status,
        claims.username
    );
    Ok(ok(salary))
}

pub async fn delete_salary(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;

    if !repo.delete(path.into_inner()).await? {
        return Err(AppError::not_found("Salary not found"));
    }

    Ok(message("Salary deleted successfully"))
}

pub async fn generate_batch(
    claims: Claims,
    payroll: web::Data<PayrollService>,
    input: web::Json<BatchInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;

    let result = payroll.generate_batch(input.into_inner()).await?;
    Ok(created(result))
}

/// Salaries of the employee linked to the caller's account.
pub async fn my_slips(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    users: web::Data<UserRepository>,
    payroll: web::Data<PayrollService>,
    query: web::Query<OptionalPeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let period = optional_period(&payroll, &query)?;

    let employee_id = users
        .find_by_id(claims.user_id())
        .await?
        .and_then(|user| user.employee_id);

    let rows = match employee_id {
        Some(employee_id) => repo.list_by_employee(employee_id, period).await?,
        None => Vec::new(),
    };
    Ok(ok(rows))
}

/// A single slip, visible to its owner and to finance staff.
pub async fn get_slip(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    users: web::Data<UserRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let salary = repo
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Salary not found"))?;

    if !claims.role.satisfies(Role::Finance) {
        let owner = users
            .find_by_id(claims.user_id())
            .await?
            .and_then(|user| user.employee_id);
        if owner != Some(salary.salary.employee_id) {
            return Err(AppError::forbidden("You can only view your own salary slips"));
        }
    }

    Ok(ok(salary))
}

fn optional_period(
    payroll: &PayrollService,
    query: &OptionalPeriodQuery,
) -> Result<Option<Period>, AppError> {
    match (query.month, query.year) {
        (Some(month), Some(year)) => payroll.period(month, year).map(Some),
        (None, None) => Ok(None),
        _ => Err(AppError::bad_request(
            "month and year must be given together",
        )),
    }
}
