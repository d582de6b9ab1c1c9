//! Host-facing admin endpoints: settings push and the lifecycle hook.

use std::collections::HashMap;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use tracing::info;

use crate::effects::RedditInterpreter;

use super::state::AppState;

/// Replaces the settings map wholesale. Subsequent events see the new
/// snapshot; an event in flight keeps the one it loaded.
pub async fn replace_settings<I>(
    State(state): State<AppState<I>>,
    Json(values): Json<HashMap<String, String>>,
) -> StatusCode
where
    I: RedditInterpreter + Send + Sync + 'static,
{
    info!(keys = values.len(), "Settings replaced");
    state.settings().replace(values);
    StatusCode::NO_CONTENT
}

/// Install/upgrade hook: ensure exactly one recurring sweep job exists.
pub async fn lifecycle_install<I>(
    State(state): State<AppState<I>>,
) -> (StatusCode, &'static str)
where
    I: RedditInterpreter + Send + Sync + 'static,
{
    let replaced = state.reconcile_sweep();
    let tag = if replaced {
        "sweep job replaced"
    } else {
        "sweep job registered"
    };
    (StatusCode::OK, tag)
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "OK"
}
