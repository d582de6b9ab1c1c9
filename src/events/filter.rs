//! Eligibility filter for inbound comment events.
//!
//! An event is eligible only when all of these hold:
//!
//! - the event carries a comment payload and an identifiable author
//! - the author is not the bot itself (prevents self-reply loops)
//! - the comment's parent is a post, not another comment (top-level reply)
//! - the watch configuration is present (post ID and author list set)
//! - the author is on the whitelist (case-insensitive)
//! - the parent addresses the watched post
//!
//! Rejections carry a reason for logging but never raise errors or produce
//! user-visible output.

use std::fmt;

use crate::config::WatchConfig;
use crate::types::Username;

use super::event::{CommentCreateEvent, CommentPayload};

/// Why an event was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No comment payload or no identifiable author in the event.
    MissingPayload,
    /// The comment was written by the bot itself.
    SelfAuthored,
    /// The parent is not a post, so this is not a top-level reply.
    NotTopLevel,
    /// Post ID or allowed-author list is unset.
    NotConfigured,
    /// The author is not on the whitelist.
    AuthorNotAllowed,
    /// The parent does not address the watched post.
    WrongPost,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectReason::MissingPayload => "missing comment or author payload",
            RejectReason::SelfAuthored => "comment authored by the bot",
            RejectReason::NotTopLevel => "parent is not a post",
            RejectReason::NotConfigured => "watch config absent",
            RejectReason::AuthorNotAllowed => "author not on whitelist",
            RejectReason::WrongPost => "parent does not address the watched post",
        };
        write!(f, "{}", s)
    }
}

/// The filter's verdict on one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility<'a> {
    /// The event passed every check; the borrowed payloads are the inputs for
    /// the rest of the pipeline.
    Eligible {
        comment: &'a CommentPayload,
        author: &'a Username,
    },
    /// The event failed a check and must be ignored with no side effects.
    Rejected(RejectReason),
}

/// Runs the eligibility checks, in whitelist-narrowing order.
///
/// `config` is the freshly parsed watch configuration; `None` means "not
/// configured" and rejects everything.
pub fn evaluate<'a>(
    event: &'a CommentCreateEvent,
    bot_username: &Username,
    config: Option<&WatchConfig>,
) -> Eligibility<'a> {
    let (comment, author) = match (&event.comment, &event.author) {
        (Some(comment), Some(author)) => (comment, &author.name),
        _ => return Eligibility::Rejected(RejectReason::MissingPayload),
    };

    if author.eq_ignore_case(bot_username.as_str()) {
        return Eligibility::Rejected(RejectReason::SelfAuthored);
    }

    if !comment.parent_id.is_link() {
        return Eligibility::Rejected(RejectReason::NotTopLevel);
    }

    let config = match config {
        Some(config) => config,
        None => return Eligibility::Rejected(RejectReason::NotConfigured),
    };

    if !config.allows_author(author) {
        return Eligibility::Rejected(RejectReason::AuthorNotAllowed);
    }

    if !comment.parent_id.addresses(&config.watched_post_id) {
        return Eligibility::Rejected(RejectReason::WrongPost);
    }

    Eligibility::Eligible { comment, author }
}
