//! Core domain types.

pub mod ids;

pub use ids::{CommentId, ThingId, Username};
