use actix_web::{HttpResponse, web};

use crate::database::models::{PeriodQuery, Role, SalaryRecap};
use crate::database::repositories::{EmployeeRepository, SalaryRepository};
use crate::error::AppError;
use crate::handlers::shared::{attachment, ok};
use crate::services::auth::Claims;
use crate::services::{PayrollService, export};

pub async fn salary_report(
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

pub async fn employee_salary_report(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;

    let employee_id = path.into_inner();
    if !employees.exists(employee_id).await? {
        return Err(AppError::not_found("Employee not found"));
    }

    let rows = repo.list_by_employee(employee_id, None).await?;
    Ok(ok(rows))
}

pub async fn salary_recap(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    payroll: web::Data<PayrollService>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;
    let period = payroll.period(query.month, query.year)?;

    let rows = repo.list_by_period(period).await?;
    Ok(ok(SalaryRecap::from_rows(period, &rows)))
}

pub async fn export_salary_excel(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    payroll: web::Data<PayrollService>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;
    let period = payroll.period(query.month, query.year)?;

    let rows = repo.list_by_period(period).await?;
    let bytes = export::salary_report_xlsx(period, &rows)?;

    log::info!(
        "Exported salary report for {} ({} rows) by {}",
        period.label(),
        rows.len(),
        claims.username
    );
    Ok(attachment(
        export::XLSX_CONTENT_TYPE,
        &export::salary_report_filename(period),
        bytes,
    ))
}

pub async fn export_employee_salary_pdf(
    claims: Claims,
    repo: web::Data<SalaryRepository>,
    employees: web::Data<EmployeeRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;

    let employee = employees
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    let rows = repo.list_by_employee(employee.employee.id, None).await?;
    let bytes = export::salary_history_pdf(&employee, &rows)?;

    Ok(attachment(
        export::PDF_CONTENT_TYPE,
        &export::salary_history_filename(&employee),
        bytes,
    ))
}
