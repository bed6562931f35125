use std::sync::Arc;

use crate::config::ServerConfig;
use crate::service::TodoService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and the config sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: todo_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: todo_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    /// Todo use cases bound to this state's pool.
    pub fn todos(&self) -> TodoService<'_> {
        TodoService::new(&self.pool)
    }
}
