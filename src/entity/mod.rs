//! Entity module
//!
//! Backend-shaped records consumed by the org tree engine

pub mod department;
pub mod employee;
pub mod timestamp;

pub use department::Department;
pub use employee::{EmployeeRecord, Role};
