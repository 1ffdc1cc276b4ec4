//! # Reminder Lifecycle Manager
//!
//! Schedules and cancels a record's reminder pair through the injected
//! notification scheduler, keeping the pair atomic:
//!
//! ```text
//! Unscheduled -> Scheduling -> Scheduled
//! Scheduled   -> Canceling  -> Unscheduled
//! ```
//!
//! A failed submission cancels the half that already succeeded, so a record
//! never ends up holding a single handle. Calls for the same record must be
//! serialized by the caller; no locking happens here. No timeout is imposed
//! either, timeouts belong to the scheduler implementation.

use chrono::NaiveDateTime;
use shared::{
    BirthdayRecord, NotificationContent, NotificationHandle, ReminderHandles, ReminderState,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::errors::{BirthdayError, BirthdayResult};
use super::reminder_planner::ReminderPlanner;
use crate::io::{CancelOutcome, NotificationScheduler, SchedulerError};

#[derive(Clone)]
pub struct ReminderLifecycleManager {
    planner: ReminderPlanner,
    scheduler: Arc<dyn NotificationScheduler>,
}

impl ReminderLifecycleManager {
    pub fn new(planner: ReminderPlanner, scheduler: Arc<dyn NotificationScheduler>) -> Self {
        Self { planner, scheduler }
    }

    pub fn planner(&self) -> &ReminderPlanner {
        &self.planner
    }

    /// Plan and submit both reminders, storing the handles on the record.
    ///
    /// If either submission fails the other is canceled and the record stays
    /// unscheduled.
    pub async fn schedule(
        &self,
        record: &mut BirthdayRecord,
        now: NaiveDateTime,
    ) -> BirthdayResult<ReminderHandles> {
        if record.reminder_handles.is_some() {
            return Err(BirthdayError::AlreadyScheduled(record.id.clone()));
        }

        let plan = self.planner.plan_for_record(record, now)?;
        debug!("Birthday {} is {}", record.id, ReminderState::Scheduling);

        let day_of = self
            .scheduler
            .submit(plan.day_of.trigger, &plan.day_of.content)
            .await
            .map_err(|e| {
                warn!("Day-of reminder for {} rejected: {}", record.id, e);
                BirthdayError::SchedulingFailed(e.to_string())
            })?;

        let heads_up = match self
            .scheduler
            .submit(plan.heads_up.trigger, &plan.heads_up.content)
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Heads-up reminder for {} rejected: {}", record.id, e);
                return Err(match self.compensate(&record.id, &day_of).await {
                    Ok(()) => BirthdayError::SchedulingFailed(e.to_string()),
                    Err(cancel_error) => BirthdayError::OrphanedReminder {
                        reason: e.to_string(),
                        orphaned: day_of,
                        cancel_error: cancel_error.to_string(),
                    },
                });
            }
        };

        let handles = ReminderHandles {
            day_of,
            heads_up,
            scheduled_for: Some(plan.occurrence),
        };
        record.reminder_handles = Some(handles.clone());

        info!(
            "Scheduled reminders for {} ({}): day-of {} at {}, heads-up {} at {}",
            record.name,
            record.id,
            handles.day_of,
            plan.day_of.trigger,
            handles.heads_up,
            plan.heads_up.trigger
        );
        Ok(handles)
    }

    /// Cancel the record's reminder pair, if any.
    ///
    /// Handles are cleared whatever the scheduler answers. Stale handles count
    /// as canceled; any other scheduler failure is reported as `CancelFailed`
    /// after both handles were attempted.
    pub async fn cancel(&self, record: &mut BirthdayRecord) -> BirthdayResult<()> {
        let Some(handles) = record.reminder_handles.take() else {
            debug!("Birthday {} has no reminders to cancel", record.id);
            return Ok(());
        };
        debug!("Birthday {} is {}", record.id, ReminderState::Canceling);

        let mut failures = Vec::new();
        for handle in [&handles.day_of, &handles.heads_up] {
            match self.scheduler.cancel(handle).await {
                Ok(CancelOutcome::Canceled) => debug!("Canceled notification {}", handle),
                Ok(CancelOutcome::StaleHandle) | Err(SchedulerError::UnknownHandle(_)) => {
                    debug!("Notification {} already fired or expired", handle)
                }
                Err(e) => {
                    warn!("Failed to cancel notification {} for {}: {}", handle, record.id, e);
                    failures.push(format!("{}: {}", handle, e));
                }
            }
        }

        if failures.is_empty() {
            info!("Canceled reminders for {} ({})", record.name, record.id);
            Ok(())
        } else {
            Err(BirthdayError::CancelFailed(failures.join("; ")))
        }
    }

    /// Cancel then schedule; used when a record's date or content changes
    pub async fn reschedule(
        &self,
        record: &mut BirthdayRecord,
        now: NaiveDateTime,
    ) -> BirthdayResult<ReminderHandles> {
        self.cancel(record).await?;
        self.schedule(record, now).await
    }

    /// Deliver a sample notification right away
    pub async fn send_test_notification(
        &self,
        now: NaiveDateTime,
    ) -> BirthdayResult<NotificationHandle> {
        let content = NotificationContent {
            title: "🎉 Test Notification".to_string(),
            body: "This is a sample birthday reminder!".to_string(),
        };
        let handle = self
            .scheduler
            .submit(now, &content)
            .await
            .map_err(|e| BirthdayError::SchedulingFailed(e.to_string()))?;

        info!("Sent test notification {}", handle);
        Ok(handle)
    }

    /// Cancel a reminder no record owns, such as the `orphaned` handle of
    /// `BirthdayError::OrphanedReminder`. A stale handle counts as canceled.
    pub async fn cancel_orphaned(&self, handle: &NotificationHandle) -> BirthdayResult<()> {
        match self.scheduler.cancel(handle).await {
            Ok(_) | Err(SchedulerError::UnknownHandle(_)) => {
                info!("Canceled orphaned reminder {}", handle);
                Ok(())
            }
            Err(e) => Err(BirthdayError::CancelFailed(format!("{}: {}", handle, e))),
        }
    }

    async fn compensate(
        &self,
        record_id: &str,
        handle: &NotificationHandle,
    ) -> Result<(), SchedulerError> {
        match self.scheduler.cancel(handle).await {
            Ok(_) | Err(SchedulerError::UnknownHandle(_)) => {
                info!("Rolled back day-of reminder {} for {}", handle, record_id);
                Ok(())
            }
            Err(e) => {
                error!(
                    "Failed to roll back day-of reminder {} for {}: {}",
                    handle, record_id, e
                );
                Err(e)
            }
        }
    }
}
