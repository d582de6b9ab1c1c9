//! Time-bounded deduplication of processed events.
//!
//! The host delivers events at least once; the same logical event may arrive
//! again. The ledger keeps a key per processed comment for a bounded window
//! (20 minutes). Within the window a redelivery is skipped; after it expires
//! reprocessing is permitted and treated as a fresh request - acceptable,
//! since outcomes are idempotent to recompute and duplicate visible replies
//! beyond the window are rare and low-cost.
//!
//! The key is derived from the comment identifier alone (not author/content),
//! so a redelivery of the same comment - even with edited content - is still
//! deduplicated.
//!
//! Call order matters: [`DedupLedger::has_processed`] runs immediately before
//! dispatch and [`DedupLedger::mark_processed`] immediately after dispatch
//! completes, never before. A crash between the two costs at most one extra
//! duplicate on redelivery; it never silently drops a response.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::types::CommentId;

/// How long a processed event stays deduplicated.
pub const DEDUP_TTL_MINUTES: i64 = 20;

/// Key prefix for dedup entries.
const KEY_PREFIX: &str = "alreadyChecked~";

/// Returns the dedup TTL as a duration.
pub fn dedup_ttl() -> Duration {
    Duration::minutes(DEDUP_TTL_MINUTES)
}

/// Derives the deterministic dedup key for a comment.
pub fn dedup_key(comment: &CommentId) -> String {
    format!("{KEY_PREFIX}{comment}")
}

/// A key → expiry map with native per-key expiry semantics: an expired entry
/// behaves exactly as an absent one and is dropped on the read that sees it.
#[derive(Debug, Default)]
pub struct DedupLedger {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl DedupLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        DedupLedger::default()
    }

    /// Returns true if `key` was marked within its TTL window as of `now`.
    ///
    /// Expired entries are removed as a side effect, keeping the map bounded
    /// without a dedicated sweep.
    pub fn has_processed(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut entries = self.entries.lock().expect("dedup lock poisoned");
        match entries.get(key) {
            Some(expires_at) if *expires_at > now => true,
            Some(_) => {
                entries.remove(key);
                false
            }
            None => false,
        }
    }

    /// Marks `key` as processed at `now`, expiring after `ttl`.
    pub fn mark_processed(&self, key: &str, ttl: Duration, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().expect("dedup lock poisoned");
        entries.insert(key.to_string(), now + ttl);
    }

    /// Number of live (non-expired) entries as of `now`.
    pub fn len(&self, now: DateTime<Utc>) -> usize {
        let entries = self.entries.lock().expect("dedup lock poisoned");
        entries.values().filter(|expiry| **expiry > now).count()
    }
}
