//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::cleanup::{run_sweep, CleanupQueue};
use crate::config::SettingsStore;
use crate::dedup::DedupLedger;
use crate::effects::RedditInterpreter;
use crate::scheduler::SweepJob;
use crate::types::Username;

/// Everything a request handler needs, shared behind one `Arc`.
pub struct AppState<I> {
    inner: Arc<Inner<I>>,
}

struct Inner<I> {
    bot_username: Username,
    settings: SettingsStore,
    dedup: DedupLedger,
    cleanup: CleanupQueue,
    sweep_job: SweepJob,
    sweep_interval: Duration,
    interpreter: I,
}

// Manual impl: cloning shares the Arc, so `I: Clone` is not required.
impl<I> Clone for AppState<I> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I> AppState<I> {
    /// Creates fresh state with empty stores and no sweep job registered.
    pub fn new(
        bot_username: Username,
        settings: SettingsStore,
        interpreter: I,
        sweep_interval: Duration,
    ) -> Self {
        AppState {
            inner: Arc::new(Inner {
                bot_username,
                settings,
                dedup: DedupLedger::new(),
                cleanup: CleanupQueue::new(),
                sweep_job: SweepJob::new(),
                sweep_interval,
                interpreter,
            }),
        }
    }

    pub fn bot_username(&self) -> &Username {
        &self.inner.bot_username
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }

    pub fn dedup(&self) -> &DedupLedger {
        &self.inner.dedup
    }

    pub fn cleanup(&self) -> &CleanupQueue {
        &self.inner.cleanup
    }

    pub fn interpreter(&self) -> &I {
        &self.inner.interpreter
    }
}

impl<I> AppState<I>
where
    I: RedditInterpreter + Send + Sync + 'static,
{
    /// Ensures exactly one recurring sweep job is running (replace-singleton).
    ///
    /// Returns true if a prior registration was replaced.
    pub fn reconcile_sweep(&self) -> bool {
        let state = self.clone();
        self.inner
            .sweep_job
            .reconcile(self.inner.sweep_interval, move || {
                let state = state.clone();
                async move {
                    let report =
                        run_sweep(state.cleanup(), state.interpreter(), Utc::now()).await;
                    debug!(
                        reaped = report.reaped,
                        orphaned = report.orphaned,
                        deferred = report.deferred,
                        "Sweep pass complete"
                    );
                }
            })
    }
}
