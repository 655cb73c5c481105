pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use actix_web::web;
use sqlx::SqlitePool;

pub use config::Config;
pub use database::repositories::{
    AttendanceRepository, EmployeeRepository, OvertimeRepository, PositionRepository,
    SalaryRepository, UserRepository,
};
pub use error::AppError;
pub use services::{AuthService, OvertimeService, PayrollService};

use handlers::shared::{json_error_handler, path_error_handler, query_error_handler};

/// Shared application data, built once and cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<Config>,
    pub user_repository: web::Data<UserRepository>,
    pub position_repository: web::Data<PositionRepository>,
    pub employee_repository: web::Data<EmployeeRepository>,
    pub attendance_repository: web::Data<AttendanceRepository>,
    pub overtime_repository: web::Data<OvertimeRepository>,
    pub salary_repository: web::Data<SalaryRepository>,
    pub auth_service: web::Data<AuthService>,
    pub overtime_service: web::Data<OvertimeService>,
    pub payroll_service: web::Data<PayrollService>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let user_repository = UserRepository::new(pool.clone());
        let position_repository = PositionRepository::new(pool.clone());
        let employee_repository = EmployeeRepository::new(pool.clone());
        let attendance_repository = AttendanceRepository::new(pool.clone());
        let overtime_repository = OvertimeRepository::new(pool.clone());
        let salary_repository = SalaryRepository::new(pool);

        let auth_service = AuthService::new(user_repository.clone(), config.clone());
        let overtime_service =
            OvertimeService::new(overtime_repository.clone(), employee_repository.clone());
        let payroll_service = PayrollService::new(
            salary_repository.clone(),
            employee_repository.clone(),
            overtime_repository.clone(),
            &config,
        );

        Self {
            config: web::Data::new(config),
            user_repository: web::Data::new(user_repository),
            position_repository: web::Data::new(position_repository),
            employee_repository: web::Data::new(employee_repository),
            attendance_repository: web::Data::new(attendance_repository),
            overtime_repository: web::Data::new(overtime_repository),
            salary_repository: web::Data::new(salary_repository),
            auth_service: web::Data::new(auth_service),
            overtime_service: web::Data::new(overtime_service),
            payroll_service: web::Data::new(payroll_service),
        }
    }

    /// Registers the shared data, extractor error handlers and the `/api` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.user_repository.clone())
            .app_data(self.position_repository.clone())
            .app_data(self.employee_repository.clone())
            .app_data(self.attendance_repository.clone())
            .app_data(self.overtime_repository.clone())
            .app_data(self.salary_repository.clone())
            .app_data(self.auth_service.clone())
            .app_data(self.overtime_service.clone())
            .app_data(self.payroll_service.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .configure(routes::configure);
    }
}
