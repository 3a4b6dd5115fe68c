//! Application services layer scaffolding.

pub mod error;
pub mod repos;
pub mod statistics;
pub mod subjects;
