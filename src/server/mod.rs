//! HTTP surface for the host platform.
//!
//! Routes:
//!
//! - `POST /events/comment-create` - the single consumed event shape
//! - `PUT /settings` - replace the settings map
//! - `POST /lifecycle/install` - install/upgrade hook (sweep reconciliation)
//! - `GET /healthz` - liveness

pub mod admin;
pub mod event;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;

use crate::effects::RedditInterpreter;

pub use event::EventError;
pub use state::AppState;

/// Builds the application router.
pub fn router<I>(state: AppState<I>) -> Router
where
    I: RedditInterpreter + Send + Sync + 'static,
{
    Router::new()
        .route("/events/comment-create", post(event::comment_create_handler))
        .route("/settings", put(admin::replace_settings))
        .route("/lifecycle/install", post(admin::lifecycle_install))
        .route("/healthz", get(admin::health))
        .with_state(state)
}
