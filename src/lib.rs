//! Social Links Bot - watches one Reddit post for username batches from
//! whitelisted accounts and responds with each user's social links.
//!
//! The pipeline for one `CommentCreate` event:
//!
//! 1. [`events`] filters out everything but fresh top-level comments from
//!    allowed authors under the watched post.
//! 2. [`batch`] validates the comment body as a JSON array of usernames.
//! 3. [`lookup`] fetches social links for each username, one at a time.
//! 4. [`dedup`] suppresses redelivered events before anything is posted.
//! 5. [`dispatch`] delivers the aggregated result as a reply or a private
//!    message, registering a cleanup ticket for posted replies.
//! 6. [`cleanup`] reaps expired replies on the recurring [`scheduler`] sweep.
//!
//! All Reddit calls are expressed as [`effects`] data and executed by an
//! interpreter, so the whole pipeline is testable without the network.

pub mod batch;
pub mod cleanup;
pub mod config;
pub mod dedup;
pub mod dispatch;
pub mod effects;
pub mod events;
pub mod handler;
pub mod lookup;
pub mod scheduler;
pub mod server;
pub mod types;
