//! Response dispatch.
//!
//! Serializes the collected records as one JSON payload and delivers it on
//! the configured channel:
//!
//! - **Reply**: submit a reply under the triggering comment, then register a
//!   cleanup ticket for the posted reply (expiry = now + 3 hours).
//! - **Private message**: message the triggering author; nothing persistent
//!   is left behind, so no ticket.
//!
//! Side-effect ordering is significant: delivery must complete (or be
//! attempted) before the caller writes the dedup mark, so a delivery failure
//! never suppresses a legitimate retry on redelivery. A failure here
//! propagates as the fatal error for the current event; the event source's
//! redelivery, gated by the dedup ledger, is the retry mechanism.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::cleanup::{retention, CleanupQueue};
use crate::config::ResponseMethod;
use crate::effects::{RedditEffect, RedditInterpreter, RedditResponse};
use crate::lookup::LookupRecord;
use crate::types::{CommentId, Username};

/// Subject line used for private-message delivery.
pub const PM_SUBJECT: &str = "social-links-bot response";

/// Errors that can occur while dispatching a response.
#[derive(Debug, Error)]
pub enum DispatchError<E: std::error::Error + 'static> {
    /// The record sequence could not be serialized.
    #[error("failed to serialize response payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The delivery effect failed.
    #[error("delivery failed: {0}")]
    Delivery(#[source] E),

    /// The interpreter answered a delivery effect with the wrong response
    /// shape.
    #[error("unexpected response to {effect} effect")]
    UnexpectedResponse { effect: &'static str },
}

/// What the dispatcher delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// A reply was posted; `comment` is the posted reply's fullname.
    Replied { comment: CommentId },
    /// A private message was sent to the triggering author.
    Messaged { to: Username },
}

/// Serializes the record sequence into the wire payload.
pub fn render_payload(records: &[LookupRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Delivers the records and, in reply mode, schedules the posted reply for
/// cleanup.
pub async fn dispatch_response<I: RedditInterpreter>(
    interpreter: &I,
    cleanup: &CleanupQueue,
    method: ResponseMethod,
    trigger: &CommentId,
    author: &Username,
    records: &[LookupRecord],
    now: DateTime<Utc>,
) -> Result<Delivery, DispatchError<I::Error>> {
    let text = render_payload(records)?;

    match method {
        ResponseMethod::Reply => {
            let effect = RedditEffect::SubmitComment {
                parent: trigger.clone(),
                text,
            };
            let posted = match interpreter
                .interpret(effect)
                .await
                .map_err(DispatchError::Delivery)?
            {
                RedditResponse::CommentSubmitted { comment } => comment,
                _ => {
                    return Err(DispatchError::UnexpectedResponse {
                        effect: "submit_comment",
                    })
                }
            };

            info!(trigger_id = %trigger, reply_id = %posted, "Comment left");
            cleanup.schedule(posted.clone(), now + retention());

            Ok(Delivery::Replied { comment: posted })
        }
        ResponseMethod::PrivateMessage => {
            let effect = RedditEffect::SendPrivateMessage {
                to: author.clone(),
                subject: PM_SUBJECT.to_string(),
                text,
            };
            match interpreter
                .interpret(effect)
                .await
                .map_err(DispatchError::Delivery)?
            {
                RedditResponse::MessageSent => {}
                _ => {
                    return Err(DispatchError::UnexpectedResponse {
                        effect: "send_private_message",
                    })
                }
            }

            info!(trigger_id = %trigger, to = %author, "Private message sent");
            Ok(Delivery::Messaged { to: author.clone() })
        }
    }
}
