//! Per-username lookup records and the sequential fan-out.
//!
//! Each validated username produces exactly one [`LookupRecord`], in input
//! order. Lookups run sequentially: order matters for reproducible output,
//! and a humane rate of outbound calls is preferable to a burst. A later
//! change may parallelize this only if it preserves output order and still
//! writes the dedup mark after all lookups complete.
//!
//! Any lookup failure - "no such account", suspension, a transient platform
//! fault - collapses into the single `SHADOWBANNED` status. This is
//! deliberate: from the outside the bot cannot distinguish those causes and
//! must not leak the distinction either.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::effects::{RedditEffect, RedditInterpreter, RedditResponse, SocialLink};
use crate::types::Username;

/// Error codes surfaced in output records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The username could not be resolved (cause deliberately collapsed).
    Shadowbanned,
    /// The batch body was not syntactically valid JSON.
    InvalidJson,
    /// The batch decoded but failed the schema.
    JsonInvalidFormat,
    /// The batch validated to an empty list (defensive second guard; the
    /// schema already forbids empty arrays).
    NoUsersProvided,
}

/// One output record.
///
/// Per-username records carry `username` plus either `socialLinks` or
/// `error`; batch-level failures produce a single record with `error` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<Username>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<Vec<SocialLink>>,
}

impl LookupRecord {
    /// A resolved user with their (possibly empty) link list.
    pub fn found(username: Username, links: Vec<SocialLink>) -> Self {
        LookupRecord {
            username: Some(username),
            error: None,
            error_detail: None,
            social_links: Some(links),
        }
    }

    /// An unresolvable user.
    pub fn shadowbanned(username: Username) -> Self {
        LookupRecord {
            username: Some(username),
            error: Some(ErrorCode::Shadowbanned),
            error_detail: None,
            social_links: None,
        }
    }

    /// A batch-level error replacing the whole sequence.
    pub fn batch_error(code: ErrorCode, detail: Option<String>) -> Self {
        LookupRecord {
            username: None,
            error: Some(code),
            error_detail: detail,
            social_links: None,
        }
    }
}

/// Looks up every username in the batch, sequentially, preserving order.
///
/// Individual failures become terminal per-username records, never a batch
/// failure; partial success is the normal case. The returned sequence always
/// has the same length and order as the input.
pub async fn lookup_all<I: RedditInterpreter>(
    interpreter: &I,
    usernames: &[Username],
) -> Vec<LookupRecord> {
    let mut records = Vec::with_capacity(usernames.len());

    for username in usernames {
        let effect = RedditEffect::GetSocialLinks {
            username: username.clone(),
        };
        let record = match interpreter.interpret(effect).await {
            Ok(RedditResponse::SocialLinks { links }) => {
                info!(username = %username, count = links.len(), "Grabbed social links");
                LookupRecord::found(username.clone(), links)
            }
            Ok(other) => {
                // A collaborator answering the wrong shape is as unresolvable
                // as a failed lookup.
                debug!(username = %username, response = ?other, "Unexpected lookup response");
                LookupRecord::shadowbanned(username.clone())
            }
            Err(error) => {
                debug!(username = %username, error = %error, "Lookup failed");
                LookupRecord::shadowbanned(username.clone())
            }
        };
        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{ErrorClass, RedditApiError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockReddit {
        links: HashMap<String, Vec<SocialLink>>,
        transient_failures: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockReddit {
        fn new() -> Self {
            MockReddit {
                links: HashMap::new(),
                transient_failures: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_user(mut self, name: &str, links: Vec<SocialLink>) -> Self {
            self.links.insert(name.to_string(), links);
            self
        }

        fn with_transient_failure(mut self, name: &str) -> Self {
            self.transient_failures.push(name.to_string());
            self
        }
    }

    impl RedditInterpreter for MockReddit {
        type Error = RedditApiError;

        async fn interpret(&self, effect: RedditEffect) -> Result<RedditResponse, Self::Error> {
            match effect {
                RedditEffect::GetSocialLinks { username } => {
                    self.calls
                        .lock()
                        .unwrap()
                        .push(username.as_str().to_string());
                    if self.transient_failures.contains(&username.0) {
                        return Err(RedditApiError::transient("upstream flaked"));
                    }
                    self.links
                        .get(username.as_str())
                        .cloned()
                        .map(|links| RedditResponse::SocialLinks { links })
                        .ok_or_else(|| RedditApiError::not_found("no such user"))
                }
                other => panic!("unexpected effect: {:?}", other),
            }
        }
    }

    fn link(platform: &str, url: &str) -> SocialLink {
        SocialLink {
            platform: platform.to_string(),
            url: url.to_string(),
        }
    }

    fn names(list: &[&str]) -> Vec<Username> {
        list.iter().map(|s| Username::new(*s)).collect()
    }

    #[tokio::test]
    async fn output_matches_input_length_and_order() {
        let mock = MockReddit::new()
            .with_user("alice", vec![link("twitter", "https://t/alice")])
            .with_user("bob", vec![]);

        let records = lookup_all(&mock, &names(&["alice", "bob", "carol"])).await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].username.as_ref().unwrap().as_str(), "alice");
        assert_eq!(records[1].username.as_ref().unwrap().as_str(), "bob");
        assert_eq!(records[2].username.as_ref().unwrap().as_str(), "carol");

        // Lookups ran sequentially in input order.
        assert_eq!(
            *mock.calls.lock().unwrap(),
            vec!["alice", "bob", "carol"]
        );
    }

    #[tokio::test]
    async fn found_user_carries_links() {
        let mock = MockReddit::new().with_user("alice", vec![link("twitter", "https://t/alice")]);
        let records = lookup_all(&mock, &names(&["alice"])).await;
        assert_eq!(records[0].error, None);
        assert_eq!(
            records[0].social_links.as_ref().unwrap()[0].url,
            "https://t/alice"
        );
    }

    #[tokio::test]
    async fn empty_link_list_is_still_found() {
        let mock = MockReddit::new().with_user("bob", vec![]);
        let records = lookup_all(&mock, &names(&["bob"])).await;
        assert_eq!(records[0].error, None);
        assert_eq!(records[0].social_links.as_ref().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unresolvable_user_collapses_to_shadowbanned() {
        let mock = MockReddit::new();
        let records = lookup_all(&mock, &names(&["ghost"])).await;
        assert_eq!(records[0].error, Some(ErrorCode::Shadowbanned));
        assert_eq!(records[0].social_links, None);
    }

    #[tokio::test]
    async fn transient_failure_also_collapses_to_shadowbanned() {
        let mock = MockReddit::new()
            .with_user("alice", vec![])
            .with_transient_failure("flaky");

        let records = lookup_all(&mock, &names(&["flaky", "alice"])).await;

        // The failure is terminal for that username only; the batch continues.
        assert_eq!(records[0].error, Some(ErrorCode::Shadowbanned));
        assert_eq!(records[1].error, None);
        assert!(!RedditApiError::transient("x").is_not_found());
    }

    #[test]
    fn record_serialization_shapes() {
        let found = LookupRecord::found(
            Username::new("alice"),
            vec![link("twitter", "https://t/alice")],
        );
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["socialLinks"][0]["platform"], "twitter");
        assert!(json.get("error").is_none());

        let banned = LookupRecord::shadowbanned(Username::new("ghost"));
        let json = serde_json::to_value(&banned).unwrap();
        assert_eq!(json["error"], "SHADOWBANNED");
        assert!(json.get("socialLinks").is_none());
        assert!(json.get("errorDetail").is_none());

        let batch = LookupRecord::batch_error(
            ErrorCode::InvalidJson,
            Some("expected value at line 1".to_string()),
        );
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["error"], "INVALID_JSON");
        assert_eq!(json["errorDetail"], "expected value at line 1");
        assert!(json.get("username").is_none());
    }

    #[test]
    fn error_codes_serialize_screaming() {
        assert_eq!(
            serde_json::to_value(ErrorCode::JsonInvalidFormat).unwrap(),
            "JSON_INVALID_FORMAT"
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::NoUsersProvided).unwrap(),
            "NO_USERS_PROVIDED"
        );
    }
}
