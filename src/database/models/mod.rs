mod macros;

pub mod attendance;
pub mod auth;
pub mod employee;
pub mod overtime;
pub mod position;
pub mod report;
pub mod salary;
pub mod user;

// Re-export all models for easy importing
pub use attendance::*;
pub use auth::*;
pub use employee::*;
pub use overtime::*;
pub use position::*;
pub use report::*;
pub use salary::*;
pub use user::*;
