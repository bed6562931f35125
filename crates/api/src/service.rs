//! Todo use cases.
//!
//! Each mutating use case is one linear pipeline inside a single unit of
//! work: validate, load, mutate, persist, commit. An early return drops the
//! unit of work and rolls back anything staged.

use chrono::Utc;
use todo_core::error::CoreError;
use todo_core::todo::mapping::{apply_update, todo_from_create, todo_from_update};
use todo_core::todo::rules::{validate_todo, validate_update_payload};
use todo_core::todo::{CreateTodo, Todo, TodoItem, TodoListParams, TodoPage, UpdateTodo};
use todo_core::types::TodoId;
use todo_core::validation::ValidationErrors;
use todo_db::models::todo::{TodoFilter, TodoQuery};
use todo_db::repositories::TodoRepo;
use todo_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};

const ENTITY: &str = "Todo";

fn not_found(id: TodoId) -> AppError {
    tracing::warn!(todo_id = %id, "Todo not found");
    CoreError::NotFound { entity: ENTITY, id }.into()
}

/// `Some` only for rows that exist and are not soft-deleted.
fn active(todo: Option<Todo>) -> Option<Todo> {
    todo.filter(|t| !t.is_deleted)
}

/// Todo use cases over a borrowed pool.
#[derive(Clone, Copy)]
pub struct TodoService<'a> {
    pool: &'a DbPool,
}

impl<'a> TodoService<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// One filtered page, newest first. Parameter ranges are checked before
    /// any query runs.
    pub async fn list(&self, params: &TodoListParams) -> AppResult<TodoPage> {
        params.validate().map_err(ValidationErrors::from)?;

        let query = TodoQuery::from(params);

        // Count and page from the same snapshot; nothing is staged, so the
        // unit of work is simply dropped.
        let mut uow = TodoRepo::begin(self.pool).await?;
        let total_count = uow.count(&query.filter).await?;
        let rows = uow.query(&query).await?;

        let items = rows.iter().map(TodoItem::from).collect();
        Ok(TodoPage::new(
            total_count,
            params.page_number,
            params.page_size,
            items,
        ))
    }

    /// Every todo, newest first. Soft-deleted rows only when asked for.
    pub async fn get_all(&self, include_deleted: bool) -> AppResult<Vec<TodoItem>> {
        let filter = TodoFilter {
            include_deleted,
            ..TodoFilter::default()
        };
        let rows = TodoRepo::find(self.pool, &filter).await?;
        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    /// The stored entity, or `NotFound` if absent or soft-deleted.
    pub async fn get_entity(&self, id: TodoId) -> AppResult<Todo> {
        let todo = TodoRepo::find_by_id(self.pool, id).await?;
        active(todo).ok_or_else(|| not_found(id))
    }

    /// Projection of [`get_entity`](Self::get_entity).
    pub async fn get_by_id(&self, id: TodoId) -> AppResult<TodoItem> {
        self.get_entity(id).await.map(TodoItem::from)
    }

    /// Map, validate and persist a new todo.
    pub async fn create(&self, input: &CreateTodo) -> AppResult<TodoItem> {
        let now = Utc::now();
        let todo = todo_from_create(TodoId::now_v7(), input, now);
        validate_todo(&todo, now.date_naive())?;

        let mut uow = TodoRepo::begin(self.pool).await?;
        uow.add(&todo).await?;
        uow.complete().await?;

        tracing::info!(todo_id = %todo.id, "Todo created");
        Ok(TodoItem::from(todo))
    }

    /// Replace a stored todo with `todo`. The stored `created_at` survives and
    /// `modified_at` is stamped.
    pub async fn update(&self, mut todo: Todo) -> AppResult<()> {
        let now = Utc::now();
        validate_todo(&todo, now.date_naive())?;

        let mut uow = TodoRepo::begin(self.pool).await?;
        let existing = active(uow.get_by_id(todo.id).await?).ok_or_else(|| not_found(todo.id))?;

        todo.created_at = existing.created_at;
        todo.modified_at = Some(now);
        todo.is_deleted = false;

        uow.update(&todo).await?;
        uow.complete().await?;

        tracing::info!(todo_id = %todo.id, "Todo replaced");
        Ok(())
    }

    /// Merge the fields present in `payload` into a stored todo.
    ///
    /// The payload rules run again with the stored todo as context, so a
    /// completed todo keeps its due date: a payload moving it to another
    /// calendar date fails on `dueDate`.
    pub async fn update_partial(&self, id: TodoId, payload: &UpdateTodo) -> AppResult<()> {
        let now = Utc::now();
        let today = now.date_naive();
        validate_todo(&todo_from_update(payload, now), today)?;

        let mut uow = TodoRepo::begin(self.pool).await?;
        let mut todo = active(uow.get_by_id(id).await?).ok_or_else(|| not_found(id))?;

        validate_update_payload(payload, Some(&todo), today)?;
        apply_update(&mut todo, payload);
        todo.modified_at = Some(now);
        validate_todo(&todo, today)?;

        uow.update(&todo).await?;
        uow.complete().await?;

        tracing::info!(todo_id = %id, "Todo updated");
        Ok(())
    }

    /// Mark a todo deleted. Repeating it on an already deleted row succeeds.
    pub async fn soft_delete(&self, id: TodoId) -> AppResult<()> {
        let mut uow = TodoRepo::begin(self.pool).await?;
        let mut todo = uow.get_by_id(id).await?.ok_or_else(|| not_found(id))?;

        if !todo.is_deleted {
            todo.is_deleted = true;
            uow.update(&todo).await?;
            uow.complete().await?;
        }

        tracing::info!(todo_id = %id, "Todo soft-deleted");
        Ok(())
    }

    /// Remove a todo permanently, soft-deleted or not.
    pub async fn hard_delete(&self, id: TodoId) -> AppResult<()> {
        let mut uow = TodoRepo::begin(self.pool).await?;
        if !uow.remove(id).await? {
            return Err(not_found(id));
        }
        uow.complete().await?;

        tracing::info!(todo_id = %id, "Todo permanently deleted");
        Ok(())
    }
}
