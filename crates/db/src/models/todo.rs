//! Predicate and paging types for `todos` queries.

use sqlx::{QueryBuilder, Sqlite};
use todo_core::todo::TodoListParams;
use todo_core::types::Timestamp;

/// Conjunctive predicate over the `todos` table.
///
/// The default filter matches every row that is not soft-deleted.
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    /// Case-insensitive substring of `title`. Ignored when empty.
    pub title_contains: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub created_to: Option<Timestamp>,
    /// Also match soft-deleted rows.
    pub include_deleted: bool,
}

impl TodoFilter {
    /// Every row, soft-deleted ones included.
    pub fn all() -> Self {
        Self {
            include_deleted: true,
            ..Self::default()
        }
    }

    /// Append ` WHERE ...` for this filter to `qb`.
    pub(crate) fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE 1 = 1");

        if !self.include_deleted {
            qb.push(" AND is_deleted = 0");
        }
        if let Some(title) = self.title_contains.as_deref().filter(|t| !t.is_empty()) {
            qb.push(" AND instr(lower(title), lower(")
                .push_bind(title.to_string())
                .push(")) > 0");
        }
        if let Some(from) = self.created_from {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = self.created_to {
            qb.push(" AND created_at <= ").push_bind(to);
        }
    }
}

/// A filtered, ordered, paginated read.
///
/// Rows are ordered newest first by `created_at`, then by `id` so equal
/// timestamps still page deterministically.
#[derive(Debug, Clone)]
pub struct TodoQuery {
    pub filter: TodoFilter,
    pub offset: i64,
    pub limit: i64,
}

impl From<&TodoListParams> for TodoQuery {
    fn from(params: &TodoListParams) -> Self {
        Self {
            filter: TodoFilter {
                title_contains: params.title_filter.clone(),
                created_from: params.created_from,
                created_to: params.created_to,
                include_deleted: params.include_deleted,
            },
            offset: params.offset(),
            limit: params.page_size,
        }
    }
}
