//! Recurring sweep job registration.
//!
//! The install/upgrade lifecycle hook must leave **exactly one** recurring
//! sweep job running, however many times it fires. [`SweepJob::reconcile`]
//! implements that as an idempotent replace-singleton: abort whatever job is
//! currently registered, then spawn a fresh interval task. Without this,
//! sweepers would accumulate across upgrades and reap concurrently.
//!
//! The task ticks on a fixed cadence (hourly by default); the first run
//! happens one full interval after registration, matching a top-of-the-hour
//! cron registration rather than an immediate fire.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

/// Default sweep cadence (hourly).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Handle to the single recurring sweep job.
#[derive(Debug, Default)]
pub struct SweepJob {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SweepJob {
    /// Creates an empty registration (no job running).
    pub fn new() -> Self {
        SweepJob::default()
    }

    /// Ensures exactly one recurring job exists: cancels any prior
    /// registration and spawns a fresh one running `sweep` every `interval`.
    ///
    /// Returns true if a prior job was replaced.
    pub fn reconcile<F, Fut>(&self, interval: Duration, sweep: F) -> bool
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let mut slot = self.handle.lock().expect("sweep job lock poisoned");

        let replaced = match slot.take() {
            Some(prior) => {
                prior.abort();
                true
            }
            None => false,
        };

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // Consume the immediate first tick so the job runs on cadence.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                sweep().await;
            }
        });
        *slot = Some(task);

        info!(
            interval_secs = interval.as_secs(),
            replaced, "Recurring sweep job registered"
        );
        replaced
    }

    /// Cancels the job if one is registered. Returns true if one was.
    pub fn cancel(&self) -> bool {
        let mut slot = self.handle.lock().expect("sweep job lock poisoned");
        match slot.take() {
            Some(prior) => {
                prior.abort();
                true
            }
            None => false,
        }
    }

    /// True if a job is currently registered.
    pub fn is_registered(&self) -> bool {
        self.handle
            .lock()
            .expect("sweep job lock poisoned")
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_sweep(counter: Arc<AtomicUsize>) -> impl Fn() -> std::future::Ready<()> + Send {
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test]
    async fn first_reconcile_replaces_nothing() {
        let job = SweepJob::new();
        assert!(!job.is_registered());

        let replaced = job.reconcile(
            Duration::from_secs(3600),
            counting_sweep(Arc::new(AtomicUsize::new(0))),
        );
        assert!(!replaced);
        assert!(job.is_registered());
    }

    #[tokio::test]
    async fn second_reconcile_replaces_the_first() {
        let job = SweepJob::new();
        job.reconcile(
            Duration::from_secs(3600),
            counting_sweep(Arc::new(AtomicUsize::new(0))),
        );
        let replaced = job.reconcile(
            Duration::from_secs(3600),
            counting_sweep(Arc::new(AtomicUsize::new(0))),
        );
        assert!(replaced);
        assert!(job.is_registered());
    }

    #[tokio::test]
    async fn cancel_clears_the_registration() {
        let job = SweepJob::new();
        assert!(!job.cancel());

        job.reconcile(
            Duration::from_secs(3600),
            counting_sweep(Arc::new(AtomicUsize::new(0))),
        );
        assert!(job.cancel());
        assert!(!job.is_registered());
        assert!(!job.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn job_runs_on_cadence_not_immediately() {
        let job = SweepJob::new();
        let counter = Arc::new(AtomicUsize::new(0));
        job.reconcile(Duration::from_secs(60), counting_sweep(counter.clone()));

        // No immediate fire.
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn replaced_job_stops_ticking() {
        let job = SweepJob::new();
        let old_counter = Arc::new(AtomicUsize::new(0));
        let new_counter = Arc::new(AtomicUsize::new(0));

        job.reconcile(Duration::from_secs(60), counting_sweep(old_counter.clone()));
        job.reconcile(Duration::from_secs(60), counting_sweep(new_counter.clone()));

        tokio::time::sleep(Duration::from_secs(121)).await;
        tokio::task::yield_now().await;

        assert_eq!(old_counter.load(Ordering::SeqCst), 0);
        assert!(new_counter.load(Ordering::SeqCst) >= 1);
    }
}
