//! Repository for the `todos` table.
//!
//! Reads are available straight off the pool. Writes go through a
//! [`UnitOfWork`]: every mutation is staged inside one transaction and only
//! becomes visible when [`UnitOfWork::complete`] commits it.

use sqlx::{Executor, QueryBuilder, Sqlite, Transaction};
use todo_core::todo::Todo;
use todo_core::types::TodoId;

use crate::models::todo::{TodoFilter, TodoQuery};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, title, description, is_completed, due_date, created_at, \
    modified_at, is_deleted, priority, tag";

const ORDER_BY: &str = " ORDER BY created_at DESC, id DESC";

/// Provides read access to todos and opens units of work for writes.
pub struct TodoRepo;

impl TodoRepo {
    /// Start a unit of work (a transaction) on `pool`.
    pub async fn begin(pool: &DbPool) -> Result<UnitOfWork, sqlx::Error> {
        let tx = pool.begin().await?;
        Ok(UnitOfWork { tx, affected: 0 })
    }

    /// Find a todo by ID, soft-deleted rows included.
    pub async fn find_by_id(pool: &DbPool, id: TodoId) -> Result<Option<Todo>, sqlx::Error> {
        fetch_by_id(pool, id).await
    }

    /// All rows matching `filter`, newest first.
    pub async fn find(pool: &DbPool, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error> {
        fetch_filtered(pool, filter).await
    }

    /// Count rows matching `filter`.
    pub async fn count(pool: &DbPool, filter: &TodoFilter) -> Result<i64, sqlx::Error> {
        count_filtered(pool, filter).await
    }

    /// One page of rows for `query`.
    pub async fn query(pool: &DbPool, query: &TodoQuery) -> Result<Vec<Todo>, sqlx::Error> {
        fetch_page(pool, query).await
    }
}

/// A transaction over the `todos` table that stages writes until
/// [`complete`](Self::complete). Dropping it without completing rolls back.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
    affected: u64,
}

impl UnitOfWork {
    /// Find a todo by ID, soft-deleted rows included. Sees staged writes.
    pub async fn get_by_id(&mut self, id: TodoId) -> Result<Option<Todo>, sqlx::Error> {
        fetch_by_id(&mut *self.tx, id).await
    }

    /// Every row, soft-deleted ones included, newest first.
    pub async fn get_all(&mut self) -> Result<Vec<Todo>, sqlx::Error> {
        fetch_filtered(&mut *self.tx, &TodoFilter::all()).await
    }

    /// All rows matching `filter`, newest first.
    pub async fn find(&mut self, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error> {
        fetch_filtered(&mut *self.tx, filter).await
    }

    /// Whether any row matches `filter`.
    pub async fn exists(&mut self, filter: &TodoFilter) -> Result<bool, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT EXISTS (SELECT 1 FROM todos");
        filter.push_where(&mut qb);
        qb.push(")");
        qb.build_query_scalar::<bool>()
            .fetch_one(&mut *self.tx)
            .await
    }

    /// Count rows matching `filter`.
    pub async fn count(&mut self, filter: &TodoFilter) -> Result<i64, sqlx::Error> {
        count_filtered(&mut *self.tx, filter).await
    }

    /// One page of rows for `query`.
    pub async fn query(&mut self, query: &TodoQuery) -> Result<Vec<Todo>, sqlx::Error> {
        fetch_page(&mut *self.tx, query).await
    }

    /// Stage an insert of `todo`.
    pub async fn add(&mut self, todo: &Todo) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO todos ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        );
        let result = sqlx::query(&query)
            .bind(todo.id)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.is_completed)
            .bind(todo.due_date)
            .bind(todo.created_at)
            .bind(todo.modified_at)
            .bind(todo.is_deleted)
            .bind(todo.priority)
            .bind(&todo.tag)
            .execute(&mut *self.tx)
            .await?;
        self.affected += result.rows_affected();
        Ok(())
    }

    /// Stage a full replacement of the row with `todo.id`.
    ///
    /// Returns `false` if no such row exists.
    pub async fn update(&mut self, todo: &Todo) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE todos SET \
                 title = $2, \
                 description = $3, \
                 is_completed = $4, \
                 due_date = $5, \
                 created_at = $6, \
                 modified_at = $7, \
                 is_deleted = $8, \
                 priority = $9, \
                 tag = $10 \
             WHERE id = $1",
        )
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.is_completed)
        .bind(todo.due_date)
        .bind(todo.created_at)
        .bind(todo.modified_at)
        .bind(todo.is_deleted)
        .bind(todo.priority)
        .bind(&todo.tag)
        .execute(&mut *self.tx)
        .await?;
        self.affected += result.rows_affected();
        Ok(result.rows_affected() > 0)
    }

    /// Stage a permanent delete. Returns `true` if a row was removed.
    pub async fn remove(&mut self, id: TodoId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        self.affected += result.rows_affected();
        Ok(result.rows_affected() > 0)
    }

    /// Commit every staged change atomically. Returns the number of rows
    /// written by this unit of work.
    pub async fn complete(self) -> Result<u64, sqlx::Error> {
        let affected = self.affected;
        self.tx.commit().await?;
        tracing::debug!(affected, "Unit of work committed");
        Ok(affected)
    }
}

// ---------------------------------------------------------------------------
// Shared query helpers (pool or transaction)
// ---------------------------------------------------------------------------

async fn fetch_by_id<'e, E>(executor: E, id: TodoId) -> Result<Option<Todo>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
    sqlx::query_as::<_, Todo>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

async fn fetch_filtered<'e, E>(executor: E, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM todos"));
    filter.push_where(&mut qb);
    qb.push(ORDER_BY);
    qb.build_query_as::<Todo>().fetch_all(executor).await
}

async fn count_filtered<'e, E>(executor: E, filter: &TodoFilter) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM todos");
    filter.push_where(&mut qb);
    qb.build_query_scalar::<i64>().fetch_one(executor).await
}

async fn fetch_page<'e, E>(executor: E, query: &TodoQuery) -> Result<Vec<Todo>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM todos"));
    query.filter.push_where(&mut qb);
    qb.push(ORDER_BY);
    qb.push(" LIMIT ")
        .push_bind(query.limit)
        .push(" OFFSET ")
        .push_bind(query.offset);
    qb.build_query_as::<Todo>().fetch_all(executor).await
}
