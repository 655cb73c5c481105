pub mod attendance;
pub mod auth;
pub mod employees;
pub mod overtime;
pub mod positions;
pub mod reports;
pub mod salaries;
pub mod shared;
