//! Inbound event types and the eligibility filter.
//!
//! The host delivers `CommentCreate` events with at-least-once semantics; the
//! same logical event may arrive more than once. This module defines the
//! typed event shape and the filter that decides, per event, whether the
//! comment is an eligible batch request. Every rejection is silent to the end
//! user (logged only).

pub mod event;
pub mod filter;

pub use event::{AuthorPayload, CommentCreateEvent, CommentPayload};
pub use filter::{evaluate, Eligibility, RejectReason};
