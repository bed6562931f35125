//! Payload → entity and entity → response mapping.

use chrono::NaiveTime;

use super::model::{CreateTodo, Todo, TodoItem, UpdateTodo, DEFAULT_TAG};
use crate::types::{Timestamp, TodoId};

/// Build a new entity from a create payload.
///
/// - `tag` falls back to [`DEFAULT_TAG`] when blank
/// - an empty `description` becomes `None`
/// - `due_date` is kept only when strictly after `now`
/// - completion, deletion and modification state start cleared
pub fn todo_from_create(id: TodoId, input: &CreateTodo, now: Timestamp) -> Todo {
    let tag = match input.tag.as_deref() {
        Some(tag) if !tag.trim().is_empty() => tag.to_string(),
        _ => DEFAULT_TAG.to_string(),
    };

    Todo {
        id,
        title: input.title.clone(),
        description: input.description.clone().filter(|d| !d.is_empty()),
        is_completed: false,
        due_date: input.due_date.filter(|due| *due > now),
        created_at: now,
        modified_at: None,
        is_deleted: false,
        priority: input.priority,
        tag: Some(tag),
    }
}

/// Apply the fields present in `input` onto `todo`. Absent fields are untouched.
///
/// Strings are trimmed and ignored when blank; the due date keeps only its
/// calendar date (midnight UTC).
pub fn apply_update(todo: &mut Todo, input: &UpdateTodo) {
    if let Some(title) = non_blank_trimmed(&input.title) {
        todo.title = title;
    }
    if let Some(description) = non_blank_trimmed(&input.description) {
        todo.description = Some(description);
    }
    if let Some(due) = input.due_date {
        todo.due_date = Some(start_of_day(due));
    }
    if let Some(tag) = non_blank_trimmed(&input.tag) {
        todo.tag = Some(tag);
    }
    if let Some(priority) = input.priority {
        todo.priority = priority;
    }
    if let Some(is_completed) = input.is_completed {
        todo.is_completed = is_completed;
    }
}

/// The shape an update payload maps to on its own: a blank entity with the
/// payload applied. Used to validate the payload before touching storage.
pub fn todo_from_update(input: &UpdateTodo, now: Timestamp) -> Todo {
    let mut todo = Todo::blank(TodoId::nil(), now);
    apply_update(&mut todo, input);
    todo
}

impl From<&Todo> for TodoItem {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            is_completed: todo.is_completed,
            due_date: todo.due_date,
            created_at: todo.created_at,
            tag: todo.tag.clone(),
            priority: todo.priority,
        }
    }
}

impl From<Todo> for TodoItem {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            is_completed: todo.is_completed,
            due_date: todo.due_date,
            created_at: todo.created_at,
            tag: todo.tag,
            priority: todo.priority,
        }
    }
}

fn non_blank_trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn start_of_day(ts: Timestamp) -> Timestamp {
    ts.date_naive().and_time(NaiveTime::MIN).and_utc()
}
