//! Effects-as-data for the external platform collaborators.
//!
//! The bot never talks to the platform directly. Every outbound operation -
//! looking up a user's social links, posting a reply, sending a private
//! message, deleting a comment - is described by a [`RedditEffect`] value and
//! executed by a [`RedditInterpreter`]. This enables:
//!
//! - Pure pipeline logic that is testable with mock interpreters
//! - Logging/tracing of intended operations
//! - Swapping the transport without touching the core
//!
//! The production interpreter is [`http::HttpEffectClient`], which forwards
//! effects to the host's collaborator endpoint.

use std::future::Future;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod http;

pub use error::{RedditApiError, RedditErrorKind};
pub use http::HttpEffectClient;

use crate::types::{CommentId, Username};

/// A social link on a user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Platform name (e.g. `twitter`, `youtube`).
    pub platform: String,
    /// The link target.
    pub url: String,
}

/// An operation against the platform, described as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect_type", rename_all = "snake_case")]
pub enum RedditEffect {
    /// Resolve a username to its profile's public social links.
    GetSocialLinks { username: Username },

    /// Submit a reply under the given comment.
    SubmitComment { parent: CommentId, text: String },

    /// Send a private message.
    SendPrivateMessage {
        to: Username,
        subject: String,
        text: String,
    },

    /// Delete a bot-authored comment.
    DeleteComment { comment: CommentId },
}

impl RedditEffect {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            RedditEffect::GetSocialLinks { .. } => "get_social_links",
            RedditEffect::SubmitComment { .. } => "submit_comment",
            RedditEffect::SendPrivateMessage { .. } => "send_private_message",
            RedditEffect::DeleteComment { .. } => "delete_comment",
        }
    }
}

/// The response to a successfully executed [`RedditEffect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "response_type", rename_all = "snake_case")]
pub enum RedditResponse {
    /// The resolved link list (possibly empty) for `GetSocialLinks`.
    SocialLinks { links: Vec<SocialLink> },

    /// The fullname of the comment created by `SubmitComment`.
    CommentSubmitted { comment: CommentId },

    /// `SendPrivateMessage` was delivered.
    MessageSent,

    /// `DeleteComment` completed.
    CommentDeleted,
}

/// Interprets platform effects.
///
/// Implementations execute effects against the real platform (or a mock).
/// The error type must classify "thing does not exist" failures so the
/// lookup fan-out can collapse them to the shadowbanned status and the
/// cleanup sweep can treat "already gone" as success.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct MockReddit {
///     links: HashMap<Username, Vec<SocialLink>>,
/// }
///
/// impl RedditInterpreter for MockReddit {
///     type Error = RedditApiError;
///
///     async fn interpret(&self, effect: RedditEffect) -> Result<RedditResponse, Self::Error> {
///         match effect {
///             RedditEffect::GetSocialLinks { username } => self
///                 .links
///                 .get(&username)
///                 .cloned()
///                 .map(|links| RedditResponse::SocialLinks { links })
///                 .ok_or_else(|| RedditApiError::not_found("no such user")),
///             _ => Ok(RedditResponse::CommentDeleted),
///         }
///     }
/// }
/// ```
pub trait RedditInterpreter {
    /// The error type returned by this interpreter.
    type Error: std::error::Error + ErrorClass + Send + Sync + 'static;

    /// Execute an effect and return its response.
    fn interpret(
        &self,
        effect: RedditEffect,
    ) -> impl Future<Output = Result<RedditResponse, Self::Error>> + Send;
}

/// Classification hooks the core needs from interpreter errors.
pub trait ErrorClass {
    /// True if the failure means the referenced thing does not exist
    /// (deleted comment, unresolvable user).
    fn is_not_found(&self) -> bool;
}
