//! The todo entity, its payloads, rule sets and mapping functions.

pub mod mapping;
pub mod model;
pub mod rules;

pub use model::{
    CreateTodo, Priority, Todo, TodoItem, TodoListParams, TodoPage, UpdateTodo, DEFAULT_TAG,
};
