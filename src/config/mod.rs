//! Typed configuration for the watched thread.
//!
//! The host exposes three named settings:
//!
//! - `postId` - bare ID of the post to watch (e.g. `1g3l6a6`)
//! - `accountName` - comma-separated account names to accept batches from,
//!   not case sensitive
//! - `responseMethod` - `reply` (default) or `privateMessage`
//!
//! Settings are loaded fresh for every event and parsed into [`WatchConfig`]
//! in one step. "Not configured" (either of the first two settings missing or
//! blank) is a first-class absent state: [`WatchConfig::from_settings`]
//! returns `None` and the event is silently ignored.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::types::Username;

/// Setting key for the watched post ID.
pub const SETTING_POST_ID: &str = "postId";
/// Setting key for the comma-separated allowed author list.
pub const SETTING_ACCOUNT_NAMES: &str = "accountName";
/// Setting key for the response delivery method.
pub const SETTING_RESPONSE_METHOD: &str = "responseMethod";

/// How the bot delivers its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseMethod {
    /// Reply in the watched thread. The reply is reaped by the cleanup sweep
    /// after the retention window.
    Reply,
    /// Send a private message to the triggering author. Nothing persistent is
    /// left behind, so no cleanup ticket is created.
    PrivateMessage,
}

impl ResponseMethod {
    /// Parses the setting value. Unknown values fall back to [`Reply`]
    /// (the documented default) with a warning rather than disabling the bot.
    ///
    /// [`Reply`]: ResponseMethod::Reply
    fn parse(value: Option<&str>) -> Self {
        match value {
            None => ResponseMethod::Reply,
            Some("reply") => ResponseMethod::Reply,
            Some("privateMessage") => ResponseMethod::PrivateMessage,
            Some(other) => {
                tracing::warn!(value = %other, "Unknown responseMethod setting, defaulting to reply");
                ResponseMethod::Reply
            }
        }
    }
}

/// The parsed watch configuration for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Bare ID of the watched post.
    pub watched_post_id: String,

    /// Allowed author names, lowercased.
    pub allowed_authors: HashSet<String>,

    /// Chosen delivery method.
    pub response_method: ResponseMethod,
}

impl WatchConfig {
    /// Parses the raw settings map into a typed config.
    ///
    /// Returns `None` when the post ID or the author list is unset or blank;
    /// the caller treats that as "not configured" and ignores the event.
    pub fn from_settings(settings: &HashMap<String, String>) -> Option<WatchConfig> {
        let post_id = settings
            .get(SETTING_POST_ID)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())?;

        let allowed_authors: HashSet<String> = settings
            .get(SETTING_ACCOUNT_NAMES)
            .map(|names| {
                names
                    .split(',')
                    .map(|name| name.trim().to_lowercase())
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if allowed_authors.is_empty() {
            return None;
        }

        let response_method =
            ResponseMethod::parse(settings.get(SETTING_RESPONSE_METHOD).map(|s| s.as_str()));

        Some(WatchConfig {
            watched_post_id: post_id.to_string(),
            allowed_authors,
            response_method,
        })
    }

    /// Returns true if the author is on the whitelist (case-insensitive).
    pub fn allows_author(&self, author: &Username) -> bool {
        self.allowed_authors.contains(&author.to_lowercase())
    }
}

/// The host-pushed settings map.
///
/// Events read a snapshot of the current map so a settings update arriving
/// mid-event cannot produce a half-applied config.
#[derive(Debug, Default)]
pub struct SettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl SettingsStore {
    /// Creates an empty (not configured) store.
    pub fn new() -> Self {
        SettingsStore::default()
    }

    /// Seeds the store from initial values, skipping absent ones.
    pub fn seeded(values: impl IntoIterator<Item = (String, Option<String>)>) -> Self {
        let store = SettingsStore::new();
        let mut map = HashMap::new();
        for (key, value) in values {
            if let Some(value) = value {
                map.insert(key, value);
            }
        }
        *store.values.lock().expect("settings lock poisoned") = map;
        store
    }

    /// Replaces the whole settings map.
    pub fn replace(&self, values: HashMap<String, String>) {
        *self.values.lock().expect("settings lock poisoned") = values;
    }

    /// Returns a snapshot of the current settings.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.lock().expect("settings lock poisoned").clone()
    }
}
