//! Router configuration for the HTTP API.
//!
//! Sets up every route plus request tracing and the body size limit.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.body_limit;

    Router::new()
        // Pages
        .route("/home", get(handlers::home))
        .route(
            "/CreateMachine",
            get(handlers::create_machine_page).post(handlers::create_machine),
        )
        .route("/UpdateMachine", put(handlers::update_machine_page))
        // Machine CRUD
        .route("/createMachine", post(handlers::create_machine))
        .route("/machines", get(handlers::list_machines))
        .route("/machines/{id}", get(handlers::get_machine))
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::templates::Templates;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new());
        let state = AppState::new(repo, Templates::default());
        let _router = create_router(state);
    }
}
