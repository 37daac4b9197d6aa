//! profiled library - user profile record service
//!
//! Create, read, update (full and partial), bulk create, bulk
//! partial-update, and delete of user profile records, plus storage and
//! retrieval of an attached profile photo.

use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod assets;
pub mod coerce;
pub mod config;
pub mod db;
pub mod error;
pub mod service;

use service::UserService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record service, constructed once at startup
    pub users: UserService,
}

impl AppState {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

/// Build application router
///
/// `uploads_dir` is also served statically under `/uploads` so stored
/// profile photos are retrievable by the filename persisted on the record.
pub fn build_router(state: AppState, uploads_dir: &Path) -> Router {
    Router::new()
        .route("/users", get(api::list_users).post(api::create_user))
        .route(
            "/users/bulk",
            post(api::create_users_bulk).put(api::update_users_bulk),
        )
        .route(
            "/users/:id",
            get(api::get_user)
                .put(api::update_user)
                .delete(api::delete_user),
        )
        .merge(api::health_routes())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(api::users::BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
