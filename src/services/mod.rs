pub mod auth;
pub mod export;
pub mod overtime;
pub mod payroll;

pub use auth::{AuthService, Claims};
pub use overtime::OvertimeService;
pub use payroll::PayrollService;
