use actix_web::{HttpResponse, web};

use crate::config::Config;
use crate::database::models::{
    AttendanceInput, AttendanceUpdateInput, DateRangeQuery, PeriodQuery, Role,
};
use crate::database::repositories::{AttendanceRepository, EmployeeRepository};
use crate::database::types::Period;
use crate::error::AppError;
use crate::handlers::shared::{attachment, created, message, ok};
use crate::services::auth::Claims;
use crate::services::export;

pub async fn list_attendance(
    _claims: Claims,
    repo: web::Data<AttendanceRepository>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    let (start, end) = query.resolve()?;

    let rows = repo.list_by_range(start, end).await?;
    Ok(ok(rows))
}

pub async fn list_employee_attendance(
    _claims: Claims,
    repo: web::Data<AttendanceRepository>,
    path: web::Path<i64>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    let (start, end) = query.resolve()?;

    let rows = repo.list_by_employee(path.into_inner(), start, end).await?;
    Ok(ok(rows))
}

pub async fn get_attendance(
    _claims: Claims,
    repo: web::Data<AttendanceRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let attendance = repo
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Attendance record not found"))?;

    Ok(ok(attendance))
}

pub async fn create_attendance(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    employees: web::Data<EmployeeRepository>,
    input: web::Json<AttendanceInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;

    if !employees.exists(input.employee_id).await? {
        return Err(AppError::not_found("Employee not found"));
    }
    if repo.exists_for_day(input.employee_id, input.date).await? {
        return Err(AppError::conflict(format!(
            "Attendance for {} is already recorded",
            input.date
        )));
    }

    let attendance = repo.create(&input).await?;
    Ok(created(attendance))
}

pub async fn update_attendance(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    path: web::Path<i64>,
    input: web::Json<AttendanceUpdateInput>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;

    let attendance = repo
        .update(path.into_inner(), &input)
        .await?
        .ok_or_else(|| AppError::not_found("Attendance record not found"))?;

    Ok(ok(attendance))
}

pub async fn delete_attendance(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Hr)?;

    if !repo.delete(path.into_inner()).await? {
        return Err(AppError::not_found("Attendance record not found"));
    }

    Ok(message("Attendance record deleted successfully"))
}

pub async fn attendance_recap(
    _claims: Claims,
    repo: web::Data<AttendanceRepository>,
    employees: web::Data<EmployeeRepository>,
    config: web::Data<Config>,
    path: web::Path<i64>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let period = Period::new(query.month, query.year, config.period_bounds())?;

    if !employees.exists(employee_id).await? {
        return Err(AppError::not_found("Employee not found"));
    }

    let recap = repo
        .recap(employee_id, period.first_day(), period.last_day())
        .await?;
    Ok(ok(recap))
}

pub async fn export_attendance_excel(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;
    let (start, end) = query.resolve()?;

    let rows = repo.list_by_range(start, end).await?;
    let bytes = export::attendance_report_xlsx(start, end, &rows)?;

    Ok(attachment(
        export::XLSX_CONTENT_TYPE,
        &export::attendance_report_filename(start, end),
        bytes,
    ))
}

pub async fn export_employee_attendance_pdf(
    claims: Claims,
    repo: web::Data<AttendanceRepository>,
    employees: web::Data<EmployeeRepository>,
    config: web::Data<Config>,
    path: web::Path<i64>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require(Role::Finance)?;
    let period = Period::new(query.month, query.year, config.period_bounds())?;

    let employee = employees
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;
    let employee_id = employee.employee.id;

    let mut rows = repo
        .list_by_employee(employee_id, period.first_day(), period.last_day())
        .await?;
    rows.reverse();
    let recap = repo
        .recap(employee_id, period.first_day(), period.last_day())
        .await?;

    let bytes = export::attendance_pdf(&employee, period, &rows, &recap)?;
    Ok(attachment(
        export::PDF_CONTENT_TYPE,
        &export::attendance_pdf_filename(&employee, period),
        bytes,
    ))
}
