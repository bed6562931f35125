//! Handlers for the `/todos` resource.
//!
//! Handlers stay thin: extract, delegate to [`TodoService`](crate::service::TodoService),
//! shape the response.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use todo_core::error::CoreError;
use todo_core::todo::rules::validate_update_payload;
use todo_core::todo::{CreateTodo, TodoListParams, UpdateTodo};
use todo_core::types::TodoId;

use crate::error::{AppError, AppResult};
use crate::extract::JsonPayload;
use crate::state::AppState;

/// GET /api/todos
///
/// One page of todos. Bad paging parameters come back as field errors; any
/// other failure is reported as a plain 400.
pub async fn list_todos(
    State(state): State<AppState>,
    Query(params): Query<TodoListParams>,
) -> AppResult<impl IntoResponse> {
    let page = state.todos().list(&params).await.map_err(|err| match err {
        err @ AppError::Core(CoreError::Validation(_)) => err,
        other => {
            tracing::error!(error = %other, "Failed to list todos");
            AppError::BadRequest(other.to_string())
        }
    })?;

    Ok(Json(page))
}

/// GET /api/todos/{id}
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> AppResult<impl IntoResponse> {
    let item = state.todos().get_by_id(id).await?;
    Ok(Json(item))
}

/// POST /api/todos
///
/// Returns 201 with the created item and its location.
pub async fn create_todo(
    State(state): State<AppState>,
    JsonPayload(input): JsonPayload<CreateTodo>,
) -> AppResult<impl IntoResponse> {
    let item = state.todos().create(&input).await?;
    let location = format!("/api/todos/{}", item.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)))
}

/// PUT /api/todos/{id}
///
/// Applies the fields present in the body. The payload rules run first,
/// without the stored todo as context.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
    JsonPayload(input): JsonPayload<UpdateTodo>,
) -> AppResult<impl IntoResponse> {
    validate_update_payload(&input, None, Utc::now().date_naive())?;

    state.todos().update_partial(id, &input).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/todos/{id}/complete
///
/// Flips the completion flag.
pub async fn toggle_complete(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> AppResult<impl IntoResponse> {
    let service = state.todos();
    let mut todo = service.get_entity(id).await?;
    todo.is_completed = !todo.is_completed;
    let is_completed = todo.is_completed;

    service.update(todo).await?;

    tracing::info!(todo_id = %id, is_completed, "Todo completion toggled");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/todos/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> AppResult<impl IntoResponse> {
    state.todos().soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/todos/{id}/permanent
pub async fn delete_todo_permanently(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> AppResult<impl IntoResponse> {
    state.todos().hard_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
