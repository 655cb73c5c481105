use actix_web::web;

use crate::handlers::reports;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/salaries", web::get().to(reports::salary_report))
            .route(
                "/salaries/employee/{id}",
                web::get().to(reports::employee_salary_report),
            )
            .route("/recap", web::get().to(reports::salary_recap))
            .route("/export/excel", web::get().to(reports::export_salary_excel))
            .route(
                "/export/employee/{id}/pdf",
                web::get().to(reports::export_employee_salary_pdf),
            ),
    );
}
