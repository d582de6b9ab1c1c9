//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different ID types (e.g., using a
//! raw parent fullname where a comment ID is expected) and make the code more
//! self-documenting.
//!
//! Reddit "fullnames" carry a structural kind prefix: `t1_` for comments and
//! `t3_` for posts (links). The eligibility filter relies on that tag to tell
//! top-level replies (parent is a post) from nested replies (parent is a
//! comment).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fullname prefix for comments.
const COMMENT_PREFIX: &str = "t1_";
/// Fullname prefix for posts (links).
const LINK_PREFIX: &str = "t3_";

/// A platform "thing" fullname, e.g. `t3_1g3l6a6` (a post) or `t1_abc123`
/// (a comment).
///
/// The kind prefix is structural: it is how the filter decides whether a
/// comment's parent is a post or another comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThingId(pub String);

impl ThingId {
    pub fn new(s: impl Into<String>) -> Self {
        ThingId(s.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this fullname addresses a post (link), i.e. `t3_`.
    pub fn is_link(&self) -> bool {
        self.0.starts_with(LINK_PREFIX)
    }

    /// Returns true if this fullname addresses a comment, i.e. `t1_`.
    pub fn is_comment(&self) -> bool {
        self.0.starts_with(COMMENT_PREFIX)
    }

    /// Returns true if this fullname addresses the given bare post ID.
    ///
    /// Settings store the bare ID (e.g. `1g3l6a6`) while fullnames carry the
    /// kind prefix (`t3_1g3l6a6`), so the check is a suffix match.
    pub fn addresses(&self, bare_post_id: &str) -> bool {
        self.0.ends_with(bare_post_id)
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ThingId {
    fn from(s: String) -> Self {
        ThingId(s)
    }
}

impl From<&str> for ThingId {
    fn from(s: &str) -> Self {
        ThingId(s.to_string())
    }
}

/// A comment identifier (fullname form, `t1_...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn new(s: impl Into<String>) -> Self {
        CommentId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CommentId {
    fn from(s: String) -> Self {
        CommentId(s)
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        CommentId(s.to_string())
    }
}

/// An account name.
///
/// Account names are compared case-insensitively everywhere the whitelist is
/// involved; the original casing is preserved for display and output records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(pub String);

impl Username {
    pub fn new(s: impl Into<String>) -> Self {
        Username(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against another name.
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Lowercased form, used as the whitelist lookup key.
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Username(s)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Username(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod thing_id {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn kind_prefixes() {
            assert!(ThingId::new("t3_1g3l6a6").is_link());
            assert!(!ThingId::new("t3_1g3l6a6").is_comment());
            assert!(ThingId::new("t1_abc").is_comment());
            assert!(!ThingId::new("t1_abc").is_link());
            assert!(!ThingId::new("t5_sub").is_link());
            assert!(!ThingId::new("").is_link());
        }

        #[test]
        fn addresses_matches_suffix() {
            let parent = ThingId::new("t3_1g3l6a6");
            assert!(parent.addresses("1g3l6a6"));
            assert!(!parent.addresses("1g3l6a7"));
        }

        proptest! {
            #[test]
            fn serde_roundtrip(s in "t[13]_[a-z0-9]{5,10}") {
                let id = ThingId::new(&s);
                let json = serde_json::to_string(&id).unwrap();
                let parsed: ThingId = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(id, parsed);
            }

            #[test]
            fn link_fullname_addresses_its_bare_id(bare in "[a-z0-9]{5,10}") {
                let id = ThingId::new(format!("t3_{}", bare));
                prop_assert!(id.is_link());
                prop_assert!(id.addresses(&bare));
            }
        }
    }

    mod comment_id {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn serde_roundtrip(s in "t1_[a-z0-9]{5,10}") {
                let id = CommentId::new(&s);
                let json = serde_json::to_string(&id).unwrap();
                let parsed: CommentId = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(id, parsed);
            }
        }

        #[test]
        fn display_matches_inner() {
            let id = CommentId::new("t1_abc");
            assert_eq!(format!("{}", id), "t1_abc");
        }
    }

    mod username {
        use super::*;

        #[test]
        fn comparison_is_case_insensitive() {
            let name = Username::new("DrRonikBot");
            assert!(name.eq_ignore_case("drronikbot"));
            assert!(name.eq_ignore_case("DRRONIKBOT"));
            assert!(!name.eq_ignore_case("someoneelse"));
        }

        #[test]
        fn lowercase_key() {
            assert_eq!(Username::new("DrRonikBot").to_lowercase(), "drronikbot");
        }
    }
}
