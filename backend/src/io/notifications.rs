//! # Notification Scheduler
//!
//! The contract the core expects from the platform's local-notification
//! facility. Implementations own delivery, permissions and any timeout
//! policy; the core only submits trigger instants with content and cancels
//! the handles it was given.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{NotificationContent, NotificationHandle};

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulerError {
    /// The platform refused the request (permissions, quota, invalid trigger, ...)
    #[error("notification rejected: {0}")]
    Rejected(String),
    /// The handle is not known to the platform, usually because it already fired
    #[error("unknown notification handle: {0}")]
    UnknownHandle(NotificationHandle),
}

/// Result of canceling a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Canceled,
    /// Handle already fired or expired; informational, not a failure
    StaleHandle,
}

#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Schedule `content` to be delivered at the local wall-clock `trigger`.
    /// A trigger at or before now means deliver immediately.
    async fn submit(
        &self,
        trigger: NaiveDateTime,
        content: &NotificationContent,
    ) -> Result<NotificationHandle, SchedulerError>;

    /// Cancel a scheduled notification. Must be idempotent.
    async fn cancel(&self, handle: &NotificationHandle) -> Result<CancelOutcome, SchedulerError>;
}
