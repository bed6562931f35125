//! Query-side models. The entity itself lives in `todo_core::todo`.

pub mod todo;
