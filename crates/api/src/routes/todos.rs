//! Route definitions for the todo resource, mounted at `/todos`.

use axum::routing::{delete, get, patch};
use axum::Router;

use crate::handlers::todos;
use crate::state::AppState;

/// ```text
/// GET    /                  -> list_todos
/// POST   /                  -> create_todo
/// GET    /{id}              -> get_todo
/// PUT    /{id}              -> update_todo
/// DELETE /{id}              -> delete_todo (soft)
/// PATCH  /{id}/complete     -> toggle_complete
/// DELETE /{id}/permanent    -> delete_todo_permanently
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/{id}",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .route("/{id}/complete", patch(todos::toggle_complete))
        .route("/{id}/permanent", delete(todos::delete_todo_permanently))
}
