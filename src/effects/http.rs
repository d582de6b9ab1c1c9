//! HTTP effect bridge.
//!
//! The host platform executes the actual Reddit calls; the bot forwards each
//! effect to a collaborator endpoint as JSON and decodes the response:
//!
//! ```text
//! POST <base_url>/effects
//! {"effect_type": "get_social_links", "username": "alice"}
//!
//! 200 {"response_type": "social_links", "links": [...]}
//! ```
//!
//! Non-2xx statuses are mapped onto the error taxonomy (404 → NotFound,
//! 429/5xx → Transient, other 4xx → Permanent); network faults are Transient.

use std::time::Duration;

use crate::effects::{RedditApiError, RedditEffect, RedditInterpreter, RedditResponse};

/// Default per-request timeout. Cancellation beyond this is the
/// collaborator's concern; the core only needs calls to terminate.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A [`RedditInterpreter`] that forwards effects to the collaborator
/// endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEffectClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpEffectClient {
    /// Creates a client for the given collaborator base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RedditApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| RedditApiError::permanent(format!("failed to build HTTP client: {e}")))?;

        Ok(HttpEffectClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn effects_url(&self) -> String {
        format!("{}/effects", self.base_url)
    }
}

impl RedditInterpreter for HttpEffectClient {
    type Error = RedditApiError;

    async fn interpret(&self, effect: RedditEffect) -> Result<RedditResponse, Self::Error> {
        let effect_name = effect.name();

        let response = self
            .http
            .post(self.effects_url())
            .json(&effect)
            .send()
            .await
            .map_err(|e| {
                RedditApiError::transient(format!("{effect_name} request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                format!("{effect_name} rejected")
            } else {
                format!("{effect_name} rejected: {body}")
            };
            return Err(RedditApiError::from_status(status.as_u16(), message));
        }

        response.json::<RedditResponse>().await.map_err(|e| {
            RedditApiError::permanent(format!("{effect_name} response malformed: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let client = HttpEffectClient::new("http://host.invalid/api/").unwrap();
        assert_eq!(client.effects_url(), "http://host.invalid/api/effects");
    }

    #[test]
    fn effects_url_appends_path() {
        let client = HttpEffectClient::new("http://host.invalid").unwrap();
        assert_eq!(client.effects_url(), "http://host.invalid/effects");
    }
}
