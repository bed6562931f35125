//! Todo entity, request payloads and response shapes.
//!
//! All wire shapes use camelCase field names, matching the browser client.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{lenient_timestamp, Timestamp, TodoId};

/// Tag assigned at creation when the caller supplies none.
pub const DEFAULT_TAG: &str = "uncategorized";

/// Priority code as stored in the `priority` INTEGER column and sent on the wire.
pub type PriorityLevel = i32;

/// Ordered priority levels. Discriminants are the stored/wire codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low = 0,
    #[default]
    Medium = 1,
    High = 2,
    Critical = 3,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    /// Return the stored priority code.
    pub fn level(self) -> PriorityLevel {
        self as PriorityLevel
    }

    /// Look up a priority by code. `None` for codes outside the enumeration.
    pub fn from_level(level: PriorityLevel) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.level() == level)
    }

    pub fn is_defined(level: PriorityLevel) -> bool {
        Self::from_level(level).is_some()
    }
}

impl From<Priority> for PriorityLevel {
    fn from(value: Priority) -> Self {
        value as PriorityLevel
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `todos` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub modified_at: Option<Timestamp>,
    pub is_deleted: bool,
    pub priority: PriorityLevel,
    pub tag: Option<String>,
}

impl Todo {
    /// A fresh entity with every field at its default and an empty title.
    pub fn blank(id: TodoId, now: Timestamp) -> Self {
        Self {
            id,
            title: String::new(),
            description: None,
            is_completed: false,
            due_date: None,
            created_at: now,
            modified_at: None,
            is_deleted: false,
            priority: Priority::default().level(),
            tag: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

fn default_priority() -> PriorityLevel {
    Priority::default().level()
}

/// Payload for `POST /api/todos`. Unknown fields (`id`, `isCompleted`, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp::deserialize")]
    pub due_date: Option<Timestamp>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: PriorityLevel,
}

/// Payload for `PUT /api/todos/{id}`. Only the fields present are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp::deserialize")]
    pub due_date: Option<Timestamp>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub priority: Option<PriorityLevel>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

/// Query parameters for `GET /api/todos`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TodoListParams {
    #[serde(default = "default_page_number")]
    #[validate(range(
        min = 1,
        max = 2147483647,
        message = "Page number must be between 1 and 2147483647"
    ))]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: i64,
    #[serde(default)]
    pub title_filter: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp::deserialize")]
    pub created_from: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_timestamp::deserialize")]
    pub created_to: Option<Timestamp>,
    #[serde(default)]
    pub include_deleted: bool,
}

impl Default for TodoListParams {
    fn default() -> Self {
        Self {
            page_number: default_page_number(),
            page_size: default_page_size(),
            title_filter: None,
            created_from: None,
            created_to: None,
            include_deleted: false,
        }
    }
}

impl TodoListParams {
    /// Rows to skip for the requested page. Saturates instead of overflowing.
    pub fn offset(&self) -> i64 {
        self.page_number
            .saturating_sub(1)
            .max(0)
            .saturating_mul(self.page_size)
    }
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Outbound projection of a [`Todo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub tag: Option<String>,
    pub priority: PriorityLevel,
}

/// One page of list results plus paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub items: Vec<TodoItem>,
}

impl TodoPage {
    /// Build a page; `total_pages` is `ceil(total_count / page_size)`.
    pub fn new(total_count: i64, page_number: i64, page_size: i64, items: Vec<TodoItem>) -> Self {
        let total_pages = if page_size > 0 {
            (total_count + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            total_count,
            page_number,
            page_size,
            total_pages,
            items,
        }
    }
}
