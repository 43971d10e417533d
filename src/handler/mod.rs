pub mod attendance;
pub mod auth;
pub mod department;
pub mod employee;
pub mod guard;
pub mod health;
pub mod leave;
pub mod salary;
