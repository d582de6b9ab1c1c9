//! Per-event processing pipeline.
//!
//! One inbound event runs to completion (or to its first unhandled fault)
//! through: eligibility filter → batch validation → lookup fan-out → dedup
//! check → dispatch → (reply mode) cleanup ticket → dedup mark.
//!
//! The dedup check sits immediately before dispatch and the mark is written
//! immediately after dispatch succeeds. A dispatch failure therefore leaves
//! no mark, so the event source's redelivery gets a clean retry; a crash
//! between check and mark costs at most one duplicate response.

use chrono::Utc;
use tracing::{debug, info};

use crate::batch::{parse_batch, BatchOutcome};
use crate::cleanup::CleanupQueue;
use crate::config::{SettingsStore, WatchConfig};
use crate::dedup::{dedup_key, dedup_ttl, DedupLedger};
use crate::dispatch::{dispatch_response, Delivery, DispatchError};
use crate::effects::RedditInterpreter;
use crate::events::{evaluate, CommentCreateEvent, Eligibility, RejectReason};
use crate::lookup::lookup_all;
use crate::types::{CommentId, Username};

/// How one event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// The event failed an eligibility check; no side effects.
    Ignored(RejectReason),

    /// The event was already processed within the dedup window; no side
    /// effects.
    Duplicate,

    /// A reply was posted (and scheduled for cleanup).
    Replied { comment: CommentId },

    /// A private message was sent.
    Messaged,
}

/// Processes one `CommentCreate` event end to end.
///
/// Filtering rejections and duplicates return successfully with no side
/// effects; only a delivery failure is an error, which the caller surfaces
/// so the event source redelivers.
pub async fn handle_comment_create<I: RedditInterpreter>(
    event: &CommentCreateEvent,
    bot_username: &Username,
    settings: &SettingsStore,
    dedup: &DedupLedger,
    cleanup: &CleanupQueue,
    interpreter: &I,
) -> Result<HandleOutcome, DispatchError<I::Error>> {
    // Settings are loaded fresh per event.
    let snapshot = settings.snapshot();
    let config = WatchConfig::from_settings(&snapshot);

    let (comment, author) = match evaluate(event, bot_username, config.as_ref()) {
        Eligibility::Eligible { comment, author } => (comment, author),
        Eligibility::Rejected(reason) => {
            debug!(reason = %reason, "Ignoring comment event");
            return Ok(HandleOutcome::Ignored(reason));
        }
    };
    let Some(config) = config.as_ref() else {
        // evaluate() already rejects unconfigured events; this arm is
        // unreachable but cheap to keep total.
        return Ok(HandleOutcome::Ignored(RejectReason::NotConfigured));
    };

    let records = match parse_batch(&comment.body) {
        BatchOutcome::Valid(usernames) => {
            info!(
                comment_id = %comment.id,
                author = %author,
                count = usernames.len(),
                "Processing username batch"
            );
            lookup_all(interpreter, &usernames).await
        }
        BatchOutcome::Invalid(record) => {
            debug!(comment_id = %comment.id, record = ?record, "Batch rejected by validation");
            vec![record]
        }
    };

    // Check immediately before dispatch; mark immediately after.
    let key = dedup_key(&comment.id);
    if dedup.has_processed(&key, Utc::now()) {
        debug!(comment_id = %comment.id, "Duplicate delivery, already processed");
        return Ok(HandleOutcome::Duplicate);
    }

    let delivery = dispatch_response(
        interpreter,
        cleanup,
        config.response_method,
        &comment.id,
        author,
        &records,
        Utc::now(),
    )
    .await?;

    dedup.mark_processed(&key, dedup_ttl(), Utc::now());

    Ok(match delivery {
        Delivery::Replied { comment } => HandleOutcome::Replied { comment },
        Delivery::Messaged { .. } => HandleOutcome::Messaged,
    })
}
