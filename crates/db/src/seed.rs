//! Sample data for a fresh database.

use chrono::{Duration, Utc};
use todo_core::todo::{Priority, Todo};
use todo_core::types::TodoId;

use crate::models::todo::TodoFilter;
use crate::repositories::TodoRepo;
use crate::DbPool;

/// Insert a few sample todos when the table is empty (soft-deleted rows count
/// as content). Returns the number of rows inserted.
pub async fn seed_sample_todos(pool: &DbPool) -> Result<u64, sqlx::Error> {
    let mut uow = TodoRepo::begin(pool).await?;
    if uow.exists(&TodoFilter::all()).await? {
        return Ok(0);
    }

    let now = Utc::now();
    let due = Some(now + Duration::days(30));
    let sample = |title: &str, description: &str| {
        let mut todo = Todo::blank(TodoId::now_v7(), now);
        todo.title = title.to_string();
        todo.description = Some(description.to_string());
        todo.tag = Some("work".to_string());
        todo.due_date = due;
        todo
    };

    let first = sample("Complete assessment", "Finish the todo app end to end");

    let mut second = sample("Review code", "Check all components work properly");
    second.created_at = now - Duration::hours(1);
    second.is_completed = true;

    let mut third = sample("Prepare presentation", "Get ready to present your work");
    third.created_at = now - Duration::days(1);
    third.priority = Priority::High.level();

    for todo in [&first, &second, &third] {
        uow.add(todo).await?;
    }
    let inserted = uow.complete().await?;

    tracing::info!(inserted, "Seeded sample todos");
    Ok(inserted)
}
