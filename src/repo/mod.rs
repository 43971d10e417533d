pub mod attendance;
pub mod departments;
pub mod employees;
pub mod leaves;
pub mod salaries;
pub mod users;
