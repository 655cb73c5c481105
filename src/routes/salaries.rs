use actix_web::web;

use crate::handlers::salaries;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/salaries")
            .route("", web::get().to(salaries::list_salaries))
            .route("", web::post().to(salaries::create_salary))
            .route("/period", web::get().to(salaries::list_salaries_by_period))
            .route("/my-slips", web::get().to(salaries::my_slips))
            .route("/generate-batch", web::post().to(salaries::generate_batch))
            .route(
                "/employee/{id}",
                web::get().to(salaries::list_employee_salaries),
            )
            .route("/slip/{id}", web::get().to(salaries::get_slip))
            .route(
                "/{id}/status",
                web::patch().to(salaries::update_salary_status),
            )
            .route("/{id}", web::get().to(salaries::get_salary))
            .route("/{id}", web::put().to(salaries::update_salary))
            .route("/{id}", web::delete().to(salaries::delete_salary)),
    );
}
