//! Batch request validation.
//!
//! An eligible comment's body must be a JSON array of usernames:
//! non-empty, unique entries, each 3-20 characters. The body is decoded and
//! checked against a fixed JSON schema; schema failures enumerate **all**
//! violations in one message so the requester gets a single actionable reply
//! instead of needing multiple round trips.
//!
//! Outcomes:
//!
//! - malformed JSON → one `INVALID_JSON` record with the parser message
//! - schema failure → one `JSON_INVALID_FORMAT` record listing every violation
//! - validated but empty → one `NO_USERS_PROVIDED` record (defensive; the
//!   schema already forbids empty arrays)
//! - otherwise → the ordered username batch

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::lookup::{ErrorCode, LookupRecord};
use crate::types::Username;

/// Minimum username length accepted in a batch.
const USERNAME_MIN_LEN: u64 = 3;
/// Maximum username length accepted in a batch.
const USERNAME_MAX_LEN: u64 = 20;

// The schema is a compile-time constant, so compiling it cannot fail.
static BATCH_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    let schema = json!({
        "type": "array",
        "items": {
            "type": "string",
            "minLength": USERNAME_MIN_LEN,
            "maxLength": USERNAME_MAX_LEN,
        },
        "minItems": 1,
        "uniqueItems": true,
    });
    jsonschema::validator_for(&schema).expect("batch schema is valid")
});

/// Result of validating one comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// A valid batch, order preserved.
    Valid(Vec<Username>),

    /// Validation failed; this single record substitutes for the whole
    /// output sequence.
    Invalid(LookupRecord),
}

/// Parses and validates a comment body as a username batch.
pub fn parse_batch(body: &str) -> BatchOutcome {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(error) => {
            return BatchOutcome::Invalid(LookupRecord::batch_error(
                ErrorCode::InvalidJson,
                Some(error.to_string()),
            ));
        }
    };

    let violations: Vec<String> = BATCH_SCHEMA
        .iter_errors(&value)
        .map(|error| error.to_string())
        .collect();
    if !violations.is_empty() {
        return BatchOutcome::Invalid(LookupRecord::batch_error(
            ErrorCode::JsonInvalidFormat,
            Some(violations.join("; ")),
        ));
    }

    // The schema guarantees an array of strings, so this cannot fail; fall
    // back to the format error rather than panicking if it somehow does.
    let usernames: Vec<Username> = match serde_json::from_value::<Vec<String>>(value) {
        Ok(list) => list.into_iter().map(Username::new).collect(),
        Err(error) => {
            return BatchOutcome::Invalid(LookupRecord::batch_error(
                ErrorCode::JsonInvalidFormat,
                Some(error.to_string()),
            ));
        }
    };

    if usernames.is_empty() {
        return BatchOutcome::Invalid(LookupRecord::batch_error(ErrorCode::NoUsersProvided, None));
    }

    BatchOutcome::Valid(usernames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn invalid(outcome: BatchOutcome) -> LookupRecord {
        match outcome {
            BatchOutcome::Invalid(record) => record,
            BatchOutcome::Valid(batch) => panic!("expected invalid, got {:?}", batch),
        }
    }

    #[test]
    fn valid_batch_preserves_order() {
        let outcome = parse_batch(r#"["alice","bob","carol"]"#);
        match outcome {
            BatchOutcome::Valid(batch) => {
                let names: Vec<&str> = batch.iter().map(|u| u.as_str()).collect();
                assert_eq!(names, vec!["alice", "bob", "carol"]);
            }
            BatchOutcome::Invalid(record) => panic!("rejected: {:?}", record),
        }
    }

    #[test]
    fn malformed_json_is_invalid_json() {
        let record = invalid(parse_batch("not json"));
        assert_eq!(record.error, Some(ErrorCode::InvalidJson));
        assert!(record.error_detail.is_some());
        assert!(record.username.is_none());
    }

    #[test]
    fn non_array_fails_schema() {
        let record = invalid(parse_batch(r#"{"user":"alice"}"#));
        assert_eq!(record.error, Some(ErrorCode::JsonInvalidFormat));
    }

    #[test]
    fn empty_array_fails_schema() {
        let record = invalid(parse_batch("[]"));
        assert_eq!(record.error, Some(ErrorCode::JsonInvalidFormat));
        assert!(!record.error_detail.as_deref().unwrap_or("").is_empty());
    }

    #[test]
    fn too_short_entry_fails_schema() {
        let record = invalid(parse_batch(r#"["a"]"#));
        assert_eq!(record.error, Some(ErrorCode::JsonInvalidFormat));
        assert!(!record.error_detail.as_deref().unwrap_or("").is_empty());
    }

    #[test]
    fn too_long_entry_fails_schema() {
        let name = "x".repeat(21);
        let record = invalid(parse_batch(&format!(r#"["{}"]"#, name)));
        assert_eq!(record.error, Some(ErrorCode::JsonInvalidFormat));
    }

    #[test]
    fn duplicate_entries_fail_schema() {
        let record = invalid(parse_batch(r#"["alice","alice"]"#));
        assert_eq!(record.error, Some(ErrorCode::JsonInvalidFormat));
    }

    #[test]
    fn non_string_entry_fails_schema() {
        let record = invalid(parse_batch(r#"["alice", 42]"#));
        assert_eq!(record.error, Some(ErrorCode::JsonInvalidFormat));
    }

    #[test]
    fn all_violations_are_enumerated() {
        // Two independent violations: one entry too short, one not a string.
        let record = invalid(parse_batch(r#"["a", 42, "bob"]"#));
        let detail = record.error_detail.unwrap();
        assert!(detail.contains(';'), "expected multiple violations: {detail}");
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        let three = "abc";
        let twenty = "x".repeat(20);
        let outcome = parse_batch(&format!(r#"["{}","{}"]"#, three, twenty));
        assert!(matches!(outcome, BatchOutcome::Valid(_)));
    }

    proptest! {
        /// Any array of distinct in-range names validates, order preserved.
        #[test]
        fn valid_batches_roundtrip(names in proptest::collection::hash_set("[a-zA-Z0-9_-]{3,20}", 1..8)) {
            let names: Vec<String> = names.into_iter().collect();
            let body = serde_json::to_string(&names).unwrap();
            match parse_batch(&body) {
                BatchOutcome::Valid(batch) => {
                    let got: Vec<&str> = batch.iter().map(|u| u.as_str()).collect();
                    let want: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
                    prop_assert_eq!(got, want);
                }
                BatchOutcome::Invalid(record) => {
                    return Err(TestCaseError::fail(format!("rejected: {:?}", record)));
                }
            }
        }

        /// Schema failures always carry a non-empty detail message.
        #[test]
        fn schema_failures_have_detail(name in "[a-z]{1,2}") {
            let record = invalid(parse_batch(&format!(r#"["{}"]"#, name)));
            prop_assert_eq!(record.error, Some(ErrorCode::JsonInvalidFormat));
            prop_assert!(!record.error_detail.unwrap_or_default().is_empty());
        }
    }
}
