//! Delayed cleanup of bot-posted replies.
//!
//! Whenever the dispatcher posts a reply comment it registers a
//! [`CleanupTicket`] (comment ID + expiry, 3 hours out). A recurring sweep
//! reaps every ticket whose expiry has passed: delete the comment, then
//! remove the ticket.
//!
//! Failure handling is at-least-once, never silently dropped:
//!
//! - "comment already gone" counts as success (the ticket is removed)
//! - any other delete failure leaves the ticket in place for the next sweep,
//!   with no retry cap - eventual consistency is fine for ephemeral content
//!
//! The queue is the only cross-task state the sweep touches. Inserts (from
//! dispatch) and the due-scan (from the sweep) are mutex-guarded, so an
//! insert concurrent with a sweep is either wholly visible to it or wholly
//! deferred to the next pass, never half-written.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::effects::{ErrorClass, RedditEffect, RedditInterpreter};
use crate::types::CommentId;

/// How long a posted reply survives before it is reaped.
pub const RETENTION_HOURS: i64 = 3;

/// Returns the retention window as a duration.
pub fn retention() -> Duration {
    Duration::hours(RETENTION_HOURS)
}

/// A scheduled future deletion of one bot-authored comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupTicket {
    pub comment: CommentId,
    pub expires_at: DateTime<Utc>,
}

/// The expiry-ordered ticket store.
///
/// Keyed by comment ID: scheduling the same comment again replaces its
/// expiry, so a comment is never reaped twice from one store.
#[derive(Debug, Default)]
pub struct CleanupQueue {
    tickets: Mutex<HashMap<CommentId, DateTime<Utc>>>,
}

impl CleanupQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        CleanupQueue::default()
    }

    /// Registers a ticket for `comment`, expiring at `expires_at`.
    pub fn schedule(&self, comment: CommentId, expires_at: DateTime<Utc>) {
        debug!(comment_id = %comment, expires_at = %expires_at, "Scheduled cleanup");
        self.tickets
            .lock()
            .expect("cleanup lock poisoned")
            .insert(comment, expires_at);
    }

    /// Returns all tickets with `expires_at <= now`, earliest first.
    ///
    /// Earliest-first ordering keeps retries fair under partial failure: a
    /// ticket that keeps failing does not starve older ones.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<CleanupTicket> {
        let tickets = self.tickets.lock().expect("cleanup lock poisoned");
        let mut due: Vec<CleanupTicket> = tickets
            .iter()
            .filter(|(_, expires_at)| **expires_at <= now)
            .map(|(comment, expires_at)| CleanupTicket {
                comment: comment.clone(),
                expires_at: *expires_at,
            })
            .collect();
        due.sort_by(|a, b| {
            a.expires_at
                .cmp(&b.expires_at)
                .then_with(|| a.comment.cmp(&b.comment))
        });
        due
    }

    /// Removes a ticket.
    pub fn remove(&self, comment: &CommentId) {
        self.tickets
            .lock()
            .expect("cleanup lock poisoned")
            .remove(comment);
    }

    /// Number of outstanding tickets.
    pub fn len(&self) -> usize {
        self.tickets.lock().expect("cleanup lock poisoned").len()
    }

    /// True if no tickets are outstanding.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome counts for one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Tickets whose comment was deleted.
    pub reaped: usize,
    /// Tickets whose comment was already gone.
    pub orphaned: usize,
    /// Tickets left in place for the next sweep after a delete failure.
    pub deferred: usize,
}

impl SweepReport {
    /// Tickets removed from the queue this pass.
    pub fn removed(&self) -> usize {
        self.reaped + self.orphaned
    }
}

/// Reaps every due ticket: delete the comment, then remove the ticket.
///
/// Per-ticket failures are logged and deferred; the sweep itself never fails.
pub async fn run_sweep<I: RedditInterpreter>(
    queue: &CleanupQueue,
    interpreter: &I,
    now: DateTime<Utc>,
) -> SweepReport {
    let due = queue.due(now);
    if due.is_empty() {
        return SweepReport::default();
    }

    let mut report = SweepReport::default();

    for ticket in due {
        let effect = RedditEffect::DeleteComment {
            comment: ticket.comment.clone(),
        };
        match interpreter.interpret(effect).await {
            Ok(_) => {
                queue.remove(&ticket.comment);
                report.reaped += 1;
            }
            Err(error) if error.is_not_found() => {
                // Already gone: someone else deleted it. Success, not an error.
                debug!(comment_id = %ticket.comment, "Comment already gone");
                queue.remove(&ticket.comment);
                report.orphaned += 1;
            }
            Err(error) => {
                warn!(
                    comment_id = %ticket.comment,
                    error = %error,
                    "Cleanup deletion failed, ticket deferred to next sweep"
                );
                report.deferred += 1;
            }
        }
    }

    if report.removed() > 0 {
        info!(
            deleted = report.removed(),
            deferred = report.deferred,
            "Deleted comment(s) via cleanup sweep"
        );
    }

    report
}
