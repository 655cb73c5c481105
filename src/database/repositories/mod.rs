pub mod attendance;
pub mod employee;
pub mod overtime;
pub mod position;
pub mod salary;
pub mod user;

// Re-export all repositories for easy importing
pub use attendance::AttendanceRepository;
pub use employee::EmployeeRepository;
pub use overtime::OvertimeRepository;
pub use position::PositionRepository;
pub use salary::SalaryRepository;
pub use user::UserRepository;
