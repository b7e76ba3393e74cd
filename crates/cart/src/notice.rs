//! User-visible notices.
//!
//! Cart operations report their outcome to a [`NoticeSink`] instead of
//! returning display strings. Front-ends decide how to show them: the CLI
//! prints them, tests record them with [`NoticeLog`].

use std::sync::{Mutex, PoisonError};

use cartwheel_core::NoticeLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A single notification shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// Unique id, used by front-ends to dismiss the notice.
    pub id: Uuid,
    /// Notice category.
    pub level: NoticeLevel,
    /// Human-readable message.
    pub message: String,
    /// When the notice was raised.
    pub issued_at: DateTime<Utc>,
}

impl Notice {
    /// Create a notice stamped with the current time.
    #[must_use]
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            issued_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }
}

/// Destination for notices.
///
/// Sinks are shared with follow-up tasks running on the tokio runtime, so
/// they must be thread-safe.
pub trait NoticeSink: Send + Sync {
    /// Deliver a notice.
    fn notify(&self, notice: Notice);
}

/// Sink that writes notices to the tracing subscriber.
///
/// Shopper-facing errors (a mistyped code) are not service failures, so they
/// are logged at `WARN`, never `ERROR`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NoticeSink for TracingSink {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error | NoticeLevel::Warning => {
                tracing::warn!(notice_id = %notice.id, level = %notice.level, "{}", notice.message);
            }
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(notice_id = %notice.id, level = %notice.level, "{}", notice.message);
            }
        }
    }
}

/// Sink that keeps every notice in memory.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all notices recorded so far, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all recorded notices.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of notices recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Levels of the recorded notices, oldest first.
    #[must_use]
    pub fn levels(&self) -> Vec<NoticeLevel> {
        self.snapshot().iter().map(|n| n.level).collect()
    }
}

impl NoticeSink for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_constructors_set_level() {
        assert_eq!(Notice::error("x").level, NoticeLevel::Error);
        assert_eq!(Notice::warning("x").level, NoticeLevel::Warning);
        assert_eq!(Notice::info("x").level, NoticeLevel::Info);
        assert_eq!(Notice::success("x").level, NoticeLevel::Success);
    }

    #[test]
    fn test_notice_ids_are_unique() {
        assert_ne!(Notice::info("a").id, Notice::info("a").id);
    }

    #[test]
    fn test_notice_log_records_and_drains() {
        let log = NoticeLog::new();
        assert!(log.is_empty());

        log.notify(Notice::success("applied"));
        log.notify(Notice::warning("one-time code"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.levels(), vec![NoticeLevel::Success, NoticeLevel::Warning]);

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "applied");
        assert!(log.is_empty());
    }

    #[test]
    fn test_tracing_sink_accepts_every_level() {
        let sink = TracingSink;
        sink.notify(Notice::error("e"));
        sink.notify(Notice::warning("w"));
        sink.notify(Notice::info("i"));
        sink.notify(Notice::success("s"));
    }
}
