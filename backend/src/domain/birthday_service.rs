use shared::{
    BirthdayRecord, CreateBirthdayRequest, CreateBirthdayResponse, NotificationHandle,
    UpcomingBirthdaysResponse, UpdateBirthdayRequest, UpdateBirthdayResponse,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::birthday_grouper::BirthdayGrouper;
use super::calendar::CalendarService;
use super::errors::{BirthdayError, BirthdayResult};
use super::reminder_lifecycle::ReminderLifecycleManager;
use super::reminder_planner::ReminderPlanner;
use crate::config::ReminderSettings;
use crate::io::{Clock, NotificationScheduler};
use crate::storage::BirthdayStorage;

/// Service for managing birthdays and keeping their reminders in sync
#[derive(Clone)]
pub struct BirthdayService {
    storage: Arc<dyn BirthdayStorage>,
    lifecycle: ReminderLifecycleManager,
    grouper: BirthdayGrouper,
    calendar: CalendarService,
    clock: Arc<dyn Clock>,
}

impl BirthdayService {
    /// Create a new BirthdayService
    pub fn new(
        storage: Arc<dyn BirthdayStorage>,
        scheduler: Arc<dyn NotificationScheduler>,
        clock: Arc<dyn Clock>,
        settings: &ReminderSettings,
    ) -> BirthdayResult<Self> {
        let calendar = settings.calendar();
        let planner = ReminderPlanner::new(calendar, settings.schedule())?;
        Ok(Self {
            storage,
            lifecycle: ReminderLifecycleManager::new(planner, scheduler),
            grouper: BirthdayGrouper::new(calendar),
            calendar,
            clock,
        })
    }

    /// Validate, schedule reminders for and persist a new birthday.
    ///
    /// Nothing is stored when scheduling fails. If storing fails the freshly
    /// scheduled reminders are canceled again.
    pub async fn add_birthday(
        &self,
        request: CreateBirthdayRequest,
    ) -> BirthdayResult<CreateBirthdayResponse> {
        info!("Adding birthday: name={}, date={}", request.name, request.date);

        let name = self.validate_name(&request.name)?;
        self.calendar.parse_birth_date(&request.date)?;

        let mut birthday = BirthdayRecord {
            id: BirthdayRecord::generate_id(),
            name,
            date: request.date.trim().to_string(),
            avatar: request.avatar,
            wish: request.wish.filter(|wish| !wish.trim().is_empty()),
            gift_ideas: request.gift_ideas,
            reminder_handles: None,
        };

        self.lifecycle.schedule(&mut birthday, self.clock.now()).await?;

        if let Err(e) = self.storage.store_birthday(&birthday).await {
            error!("Failed to store birthday {}: {}", birthday.id, e);
            if let Err(cancel_error) = self.lifecycle.cancel(&mut birthday).await {
                error!(
                    "Failed to cancel reminders of unsaved birthday {}: {}",
                    birthday.id, cancel_error
                );
            }
            return Err(e.into());
        }

        info!("Added birthday {} ({})", birthday.name, birthday.id);
        Ok(CreateBirthdayResponse {
            birthday,
            success_message: "Birthday added successfully".to_string(),
        })
    }

    /// Apply a partial update. Reminders are rescheduled when anything they
    /// show or depend on changed, or when the record had none.
    ///
    /// If rescheduling fails the edit is still saved, without reminders, and
    /// the failure is returned.
    pub async fn update_birthday(
        &self,
        request: UpdateBirthdayRequest,
    ) -> BirthdayResult<UpdateBirthdayResponse> {
        info!("Updating birthday: {:?}", request);

        let mut birthday = self
            .storage
            .get_birthday(&request.id)
            .await?
            .ok_or_else(|| BirthdayError::NotFound(request.id.clone()))?;
        let before = birthday.clone();

        if let Some(name) = request.name {
            birthday.name = self.validate_name(&name)?;
        }
        if let Some(date) = request.date {
            self.calendar.parse_birth_date(&date)?;
            birthday.date = date.trim().to_string();
        }
        if let Some(avatar) = request.avatar {
            birthday.avatar = avatar;
        }
        if let Some(wish) = request.wish {
            birthday.wish = Some(wish).filter(|wish| !wish.trim().is_empty());
        }
        if let Some(gift_ideas) = request.gift_ideas {
            birthday.gift_ideas = gift_ideas;
        }

        let reminders_stale = birthday.reminder_handles.is_none()
            || birthday.name != before.name
            || birthday.date != before.date
            || birthday.wish != before.wish
            || birthday.gift_ideas != before.gift_ideas;

        let reschedule_result = if reminders_stale {
            self.lifecycle.reschedule(&mut birthday, self.clock.now()).await.map(|_| ())
        } else {
            Ok(())
        };

        self.persist_update(&birthday).await?;

        if let Err(e) = reschedule_result {
            warn!("Saved birthday {} without reminders: {}", birthday.id, e);
            return Err(e);
        }

        info!("Updated birthday {} ({})", birthday.name, birthday.id);
        Ok(UpdateBirthdayResponse {
            birthday,
            success_message: "Birthday updated successfully".to_string(),
        })
    }

    /// Cancel a birthday's reminders, then delete it.
    ///
    /// Returns false if no such birthday exists. When cancellation fails the
    /// record is kept with its handles cleared, so retrying the delete succeeds.
    pub async fn delete_birthday(&self, birthday_id: &str) -> BirthdayResult<bool> {
        info!("Deleting birthday: {}", birthday_id);

        let Some(mut birthday) = self.storage.get_birthday(birthday_id).await? else {
            warn!("No birthday found to delete: {}", birthday_id);
            return Ok(false);
        };

        if let Err(e) = self.lifecycle.cancel(&mut birthday).await {
            self.persist_update(&birthday).await?;
            return Err(e);
        }

        let deleted = self.storage.delete_birthday(birthday_id).await?;
        info!("Deleted birthday {} ({})", birthday.name, birthday_id);
        Ok(deleted)
    }

    pub async fn get_birthday(&self, birthday_id: &str) -> BirthdayResult<Option<BirthdayRecord>> {
        Ok(self.storage.get_birthday(birthday_id).await?)
    }

    pub async fn list_birthdays(&self) -> BirthdayResult<Vec<BirthdayRecord>> {
        let birthdays = self.storage.list_birthdays().await?;
        info!("Found {} birthdays", birthdays.len());
        Ok(birthdays)
    }

    /// Birthdays grouped by time horizon as of now
    pub async fn upcoming_birthdays(&self) -> BirthdayResult<UpcomingBirthdaysResponse> {
        let now = self.clock.now();
        let birthdays = self.storage.list_birthdays().await?;
        let groups = self.grouper.group(&birthdays, now)?;
        Ok(UpcomingBirthdaysResponse {
            groups,
            generated_at: now,
        })
    }

    /// Schedule the next year's reminders for every record whose pair has
    /// already played out (or that has none). Returns how many records were
    /// (re)scheduled.
    ///
    /// Every record is attempted. If any fail, `RefreshIncomplete` lists them
    /// after the rest were refreshed.
    pub async fn refresh_reminders(&self) -> BirthdayResult<usize> {
        let now = self.clock.now();
        let today = now.date();
        let mut refreshed = 0;
        let mut failures = Vec::new();

        for mut birthday in self.storage.list_birthdays().await? {
            let needs_refresh = match &birthday.reminder_handles {
                None => true,
                Some(handles) => handles
                    .scheduled_for
                    .map_or(true, |occurrence| occurrence < today),
            };
            if !needs_refresh {
                continue;
            }

            let result = self.lifecycle.reschedule(&mut birthday, now).await;
            let outcome = match self.persist_update(&birthday).await {
                Ok(()) => result.map(|_| ()),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => refreshed += 1,
                Err(e) => {
                    warn!("Failed to refresh reminders for {}: {}", birthday.id, e);
                    failures.push(format!("{}: {}", birthday.id, e));
                }
            }
        }

        info!("Refreshed reminders for {} birthdays", refreshed);
        if failures.is_empty() {
            Ok(refreshed)
        } else {
            Err(BirthdayError::RefreshIncomplete { refreshed, failures })
        }
    }

    pub async fn send_test_notification(&self) -> BirthdayResult<NotificationHandle> {
        self.lifecycle.send_test_notification(self.clock.now()).await
    }

    /// Retry canceling a reminder left behind by `BirthdayError::OrphanedReminder`
    pub async fn cancel_orphaned(&self, handle: &NotificationHandle) -> BirthdayResult<()> {
        self.lifecycle.cancel_orphaned(handle).await
    }

    async fn persist_update(&self, birthday: &BirthdayRecord) -> BirthdayResult<()> {
        if self.storage.update_birthday(birthday).await? {
            Ok(())
        } else {
            Err(BirthdayError::NotFound(birthday.id.clone()))
        }
    }

    fn validate_name(&self, name: &str) -> BirthdayResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BirthdayError::InvalidName);
        }
        Ok(name.to_string())
    }
}
