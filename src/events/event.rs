//! The `CommentCreate` event shape.
//!
//! Only this one event shape is consumed. Fields the host may omit are
//! `Option` so a sparse payload deserializes cleanly and gets rejected by the
//! filter instead of failing the request.

use serde::{Deserialize, Serialize};

use crate::types::{CommentId, ThingId, Username};

/// A new-comment event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCreateEvent {
    /// The comment payload. Absent on malformed deliveries.
    #[serde(default)]
    pub comment: Option<CommentPayload>,

    /// The comment author. Absent on malformed deliveries.
    #[serde(default)]
    pub author: Option<AuthorPayload>,
}

/// The comment carried by a [`CommentCreateEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    /// The comment's own fullname.
    pub id: CommentId,

    /// Fullname of the parent thing. `t3_` for a top-level reply to a post,
    /// `t1_` for a reply to another comment.
    pub parent_id: ThingId,

    /// The raw comment body - for eligible comments, a JSON array of
    /// usernames.
    #[serde(default)]
    pub body: String,
}

/// The author carried by a [`CommentCreateEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorPayload {
    /// The author's account name.
    pub name: Username,
}
