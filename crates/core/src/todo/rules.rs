//! Validation rule sets for todo entities and update payloads.
//!
//! Date checks compare calendar dates in UTC; "today" is passed in so callers
//! (and tests) control the clock.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::model::{Priority, Todo, UpdateTodo};
use crate::types::Timestamp;
use crate::validation::{RuleSet, ValidationErrors};

pub const TITLE_MIN_LEN: usize = 2;
pub const TITLE_MAX_LEN: usize = 200;
pub const DESCRIPTION_MAX_LEN: usize = 2000;
pub const TAG_MAX_LEN: usize = 100;

pub const COMPLETED_DUE_DATE_MESSAGE: &str = "Cannot change due date of a completed todo";

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\s.,!?-]+$").expect("valid regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s-]+$").expect("valid regex"));

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !is_blank(s))
}

fn not_before(due: Option<Timestamp>, today: NaiveDate) -> bool {
    due.map_or(true, |d| d.date_naive() >= today)
}

/// Whether `new_due` falls on the same calendar date as `existing_due`.
/// An absent existing date never matches.
pub fn due_date_unchanged(existing_due: Option<Timestamp>, new_due: Timestamp) -> bool {
    existing_due.is_some_and(|d| d.date_naive() == new_due.date_naive())
}

/// Rules for a complete entity, applied on create and full update.
pub fn todo_rules(today: NaiveDate) -> RuleSet<Todo> {
    RuleSet::<Todo>::new()
        .rule("title", |t| !is_blank(&t.title), "Title is required")
        .rule(
            "title",
            |t| (TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&char_len(&t.title)),
            "Title must be between 2 and 200 characters",
        )
        .rule(
            "title",
            |t| TITLE_RE.is_match(&t.title),
            "Title contains invalid characters",
        )
        .rule_when(
            "description",
            |t| non_empty(&t.description),
            |t| t.description.as_deref().map_or(0, char_len) <= DESCRIPTION_MAX_LEN,
            "Description cannot exceed 2000 characters",
        )
        .rule_when(
            "dueDate",
            |t| t.due_date.is_some(),
            move |t| not_before(t.due_date, today),
            "Due date must be today or in the future",
        )
        .rule(
            "priority",
            |t| Priority::is_defined(t.priority),
            "Invalid priority level",
        )
        .rule_when(
            "tag",
            |t| non_empty(&t.tag),
            |t| t.tag.as_deref().map_or(0, char_len) <= TAG_MAX_LEN,
            "Tag cannot exceed 100 characters",
        )
        .rule_when(
            "tag",
            |t| non_empty(&t.tag),
            |t| t.tag.as_deref().is_some_and(|tag| TAG_RE.is_match(tag)),
            "Tag contains invalid characters",
        )
}

/// Rules for an update payload.
///
/// When `existing` is supplied and already completed, a supplied due date must
/// keep the existing calendar date.
pub fn update_payload_rules(today: NaiveDate, existing: Option<&Todo>) -> RuleSet<UpdateTodo> {
    // Some(existing due date) only when the existing todo is completed.
    let completed_due = existing.filter(|t| t.is_completed).map(|t| t.due_date);

    RuleSet::<UpdateTodo>::new()
        .rule_when(
            "dueDate",
            move |_| completed_due.is_some(),
            move |p| {
                p.due_date
                    .map_or(true, |d| due_date_unchanged(completed_due.flatten(), d))
            },
            COMPLETED_DUE_DATE_MESSAGE,
        )
        .rule("title", |p| non_blank(&p.title), "Title is required")
        .rule_when(
            "title",
            |p| p.title.is_some(),
            |p| p.title.as_deref().map_or(0, char_len) <= TITLE_MAX_LEN,
            "Title cannot exceed 200 characters",
        )
        .rule_when(
            "description",
            |p| non_empty(&p.description),
            |p| p.description.as_deref().map_or(0, char_len) <= DESCRIPTION_MAX_LEN,
            "Description cannot exceed 2000 characters",
        )
        .rule_when(
            "dueDate",
            |p| p.due_date.is_some(),
            move |p| not_before(p.due_date, today),
            "Due date must be today or in the future",
        )
        .rule_when(
            "tag",
            |p| non_empty(&p.tag),
            |p| p.tag.as_deref().map_or(0, char_len) <= TAG_MAX_LEN,
            "Tag cannot exceed 100 characters",
        )
        .rule("priority", |p| p.priority.is_some(), "Priority is required")
        .rule_when(
            "priority",
            |p| p.priority.is_some(),
            |p| p.priority.is_some_and(Priority::is_defined),
            "Invalid priority level",
        )
}

/// Validate a complete entity against [`todo_rules`].
pub fn validate_todo(todo: &Todo, today: NaiveDate) -> Result<(), ValidationErrors> {
    todo_rules(today).validate(todo)
}

/// Validate an update payload against [`update_payload_rules`].
pub fn validate_update_payload(
    payload: &UpdateTodo,
    existing: Option<&Todo>,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    update_payload_rules(today, existing).validate(payload)
}
