//! Error taxonomy for the birthday domain.

use shared::NotificationHandle;

/// Result alias used throughout the domain layer
pub type BirthdayResult<T> = Result<T, BirthdayError>;

#[derive(Debug, thiserror::Error)]
pub enum BirthdayError {
    /// Birth date could not be parsed or normalized
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Name cannot be empty")]
    InvalidName,
    #[error("Invalid reminder settings: {0}")]
    InvalidSettings(String),
    /// The notification scheduler rejected a submission; no partial pair is left behind
    #[error("Scheduling failed: {0}")]
    SchedulingFailed(String),
    /// A submission was rejected and the reminder already submitted for the
    /// pair could not be rolled back. It is still live and owned by no record;
    /// retry with `cancel_orphaned`.
    #[error("Scheduling failed: {reason}; reminder {orphaned} is still live: {cancel_error}")]
    OrphanedReminder {
        reason: String,
        orphaned: NotificationHandle,
        cancel_error: String,
    },
    /// Handles were cleared but the scheduler failed to cancel at least one of them
    #[error("Cancel failed: {0}")]
    CancelFailed(String),
    /// Some birthdays could not be refreshed; every other one was
    #[error("{} birthdays failed to refresh: {}", .failures.len(), .failures.join("; "))]
    RefreshIncomplete {
        refreshed: usize,
        failures: Vec<String>,
    },
    #[error("Reminders already scheduled for birthday: {0}")]
    AlreadyScheduled(String),
    #[error("Birthday not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
