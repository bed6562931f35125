//! Domain types and pure logic for the todo service: the entity model,
//! validation rules and payload mapping. No database or HTTP dependencies.

pub mod error;
pub mod todo;
pub mod types;
pub mod validation;
