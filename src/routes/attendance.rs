use actix_web::web;

use crate::handlers::attendance;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("", web::get().to(attendance::list_attendance))
            .route("", web::post().to(attendance::create_attendance))
            .route(
                "/employee/{id}",
                web::get().to(attendance::list_employee_attendance),
            )
            .route(
                "/recap/{employee_id}",
                web::get().to(attendance::attendance_recap),
            )
            .route(
                "/export/excel",
                web::get().to(attendance::export_attendance_excel),
            )
            .route(
                "/export/employee/{id}/pdf",
                web::get().to(attendance::export_employee_attendance_pdf),
            )
            .route("/{id}", web::get().to(attendance::get_attendance))
            .route("/{id}", web::put().to(attendance::update_attendance))
            .route("/{id}", web::delete().to(attendance::delete_attendance)),
    );
}
