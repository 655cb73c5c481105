use actix_web::web;

use crate::handlers::overtime;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/overtime")
            .route("", web::get().to(overtime::list_overtime))
            .route("", web::post().to(overtime::create_overtime))
            .route("/period", web::get().to(overtime::list_overtime_by_period))
            .route(
                "/employee/{id}",
                web::get().to(overtime::list_employee_overtime),
            )
            .route(
                "/recalculate-rates",
                web::post().to(overtime::recalculate_rates),
            )
            .route("/{id}/approve", web::patch().to(overtime::approve_overtime))
            .route("/{id}", web::get().to(overtime::get_overtime))
            .route("/{id}", web::put().to(overtime::update_overtime))
            .route("/{id}", web::delete().to(overtime::delete_overtime)),
    );
}
