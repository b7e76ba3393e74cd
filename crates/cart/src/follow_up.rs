//! Delayed follow-up notices.
//!
//! A follow-up is a notice delivered a fixed time after the action that
//! triggered it (for example the "one-time code" reminder shown after a
//! single-use promo is redeemed). Each one runs as a tokio task owned by a
//! [`FollowUps`] set; dropping the set, or the store that owns it, cancels
//! every task that has not fired yet.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::notice::{Notice, NoticeSink};

/// A pending follow-up. Aborted when dropped.
#[derive(Debug)]
pub struct ScheduledNotice {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledNotice {
    /// Cancel the follow-up if it has not fired yet.
    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Returns `true` once the notice was delivered or cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait until the notice is delivered (or was cancelled).
    pub async fn finish(mut self) {
        if let Some(handle) = self.handle.take() {
            // A cancelled task resolves to a JoinError; either way it is done.
            let _ = handle.await;
        }
    }
}

impl Drop for ScheduledNotice {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// The set of follow-ups owned by one store.
#[derive(Debug, Default)]
pub struct FollowUps {
    pending: Vec<ScheduledNotice>,
}

impl FollowUps {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `notice` to `sink` after `delay`.
    ///
    /// Returns `false` if no tokio runtime is available; the follow-up is
    /// then skipped.
    pub fn schedule(&mut self, delay: Duration, sink: Arc<dyn NoticeSink>, notice: Notice) -> bool {
        let Ok(runtime) = Handle::try_current() else {
            debug!(message = %notice.message, "no tokio runtime, skipping follow-up notice");
            return false;
        };

        self.pending.retain(|task| !task.is_finished());

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            sink.notify(notice);
        });

        self.pending.push(ScheduledNotice {
            handle: Some(handle),
        });
        true
    }

    /// Number of follow-ups that have not fired yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|task| !task.is_finished()).count()
    }

    /// Cancel every outstanding follow-up.
    pub fn cancel_all(&mut self) {
        let cancelled = self.pending.len();
        self.pending.clear();
        if cancelled > 0 {
            debug!(cancelled, "cancelled follow-up notices");
        }
    }

    /// Wait for every outstanding follow-up to be delivered.
    pub async fn wait_all(&mut self) {
        for task in self.pending.drain(..) {
            task.finish().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use cartwheel_core::NoticeLevel;

    use super::*;
    use crate::notice::NoticeLog;

    #[test]
    fn test_schedule_without_runtime_is_skipped() {
        let log = Arc::new(NoticeLog::new());
        let mut follow_ups = FollowUps::new();

        let scheduled = follow_ups.schedule(
            Duration::from_secs(2),
            log.clone(),
            Notice::warning("later"),
        );

        assert!(!scheduled);
        assert_eq!(follow_ups.pending(), 0);
        assert!(log.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_up_fires_after_delay() {
        let log = Arc::new(NoticeLog::new());
        let mut follow_ups = FollowUps::new();

        assert!(follow_ups.schedule(
            Duration::from_secs(2),
            log.clone(),
            Notice::warning("later"),
        ));
        assert_eq!(follow_ups.pending(), 1);

        tokio::time::sleep(Duration::from_millis(1_900)).await;
        assert!(log.is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(log.levels(), vec![NoticeLevel::Warning]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_prevents_delivery() {
        let log = Arc::new(NoticeLog::new());
        let mut follow_ups = FollowUps::new();

        follow_ups.schedule(Duration::from_secs(2), log.clone(), Notice::warning("later"));
        follow_ups.cancel_all();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(log.is_empty());
        assert_eq!(follow_ups.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let log = Arc::new(NoticeLog::new());
        {
            let mut follow_ups = FollowUps::new();
            follow_ups.schedule(Duration::from_secs(2), log.clone(), Notice::warning("later"));
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(log.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_all_delivers_everything() {
        let log = Arc::new(NoticeLog::new());
        let mut follow_ups = FollowUps::new();

        follow_ups.schedule(Duration::from_secs(1), log.clone(), Notice::info("one"));
        follow_ups.schedule(Duration::from_secs(2), log.clone(), Notice::info("two"));
        follow_ups.wait_all().await;

        assert_eq!(log.len(), 2);
        assert_eq!(follow_ups.pending(), 0);
    }
}
