//! The comment-event intake endpoint.
//!
//! The host posts `CommentCreate` events here with at-least-once delivery.
//! Responses:
//!
//! - 200 - processed, ignored, or duplicate (the host should not redeliver)
//! - 500 - delivery to the platform failed; the host's redelivery is the
//!   retry mechanism, gated by the dedup ledger once an attempt succeeds

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{info, warn};

use crate::effects::RedditInterpreter;
use crate::events::CommentCreateEvent;
use crate::handler::{handle_comment_create, HandleOutcome};

use super::state::AppState;

/// Errors surfaced by the event endpoint.
#[derive(Debug, Error)]
pub enum EventError {
    /// Posting the reply or sending the message failed.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Handles one `CommentCreate` event.
pub async fn comment_create_handler<I>(
    State(state): State<AppState<I>>,
    Json(event): Json<CommentCreateEvent>,
) -> Result<(StatusCode, &'static str), EventError>
where
    I: RedditInterpreter + Send + Sync + 'static,
{
    let outcome = handle_comment_create(
        &event,
        state.bot_username(),
        state.settings(),
        state.dedup(),
        state.cleanup(),
        state.interpreter(),
    )
    .await
    .map_err(|error| {
        warn!(error = %error, "Event processing failed");
        EventError::Delivery(error.to_string())
    })?;

    let tag = match outcome {
        HandleOutcome::Ignored(_) => "ignored",
        HandleOutcome::Duplicate => "duplicate",
        HandleOutcome::Replied { comment } => {
            info!(reply_id = %comment, "Reply dispatched");
            "replied"
        }
        HandleOutcome::Messaged => "messaged",
    };

    Ok((StatusCode::OK, tag))
}
