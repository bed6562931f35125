//! Repository layer: one module per table.

pub mod todo_repo;

pub use todo_repo::{TodoRepo, UnitOfWork};
