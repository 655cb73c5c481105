use actix_web::web;

pub mod attendance;
pub mod auth;
pub mod employees;
pub mod overtime;
pub mod positions;
pub mod reports;
pub mod salaries;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(auth::configure)
            .configure(positions::configure)
            .configure(employees::configure)
            .configure(attendance::configure)
            .configure(overtime::configure)
            .configure(salaries::configure)
            .configure(reports::configure),
    );
}
