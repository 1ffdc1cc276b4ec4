//! # Reminder Planner
//!
//! Derives the two trigger instants of a birthday's reminder pair: the
//! day-of reminder and the heads-up reminder some days earlier. The planner
//! only computes; it never talks to the notification scheduler. The
//! lifecycle manager submits what is planned here.
//!
//! ## Rollover
//!
//! When a trigger of the pair is not strictly after "now" (for example the
//! heads-up time of a birthday tomorrow has already passed this evening), the
//! whole pair moves to the following year's occurrence. Both returned
//! triggers are always strictly in the future.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use shared::{BirthdayRecord, NotificationContent};
use tracing::debug;

use super::calendar::CalendarService;
use super::errors::{BirthdayError, BirthdayResult};

/// Largest accepted heads-up offset; keeps one rollover sufficient
pub const MAX_HEADS_UP_OFFSET_DAYS: u32 = 180;

/// Times of day and offset used to derive reminder triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSchedule {
    pub day_of_time: NaiveTime,
    pub heads_up_offset_days: u32,
    pub heads_up_time: NaiveTime,
}

impl ReminderSchedule {
    pub fn validate(&self) -> BirthdayResult<()> {
        if self.heads_up_offset_days > MAX_HEADS_UP_OFFSET_DAYS {
            return Err(BirthdayError::InvalidSettings(format!(
                "heads-up offset must be between 0 and {} days, got {}",
                MAX_HEADS_UP_OFFSET_DAYS, self.heads_up_offset_days
            )));
        }
        Ok(())
    }
}

impl Default for ReminderSchedule {
    fn default() -> Self {
        Self {
            day_of_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            heads_up_offset_days: 1,
            heads_up_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Trigger instants for one occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderTriggers {
    /// Occurrence the triggers were derived from
    pub occurrence: NaiveDate,
    pub day_of_trigger: NaiveDateTime,
    pub heads_up_trigger: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    DayOf,
    HeadsUp,
}

/// A trigger with the content to deliver at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReminder {
    pub kind: ReminderKind,
    pub trigger: NaiveDateTime,
    pub content: NotificationContent,
}

/// Everything the lifecycle manager needs to submit a record's reminder pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPlan {
    pub occurrence: NaiveDate,
    pub day_of: PlannedReminder,
    pub heads_up: PlannedReminder,
}

#[derive(Debug, Clone, Copy)]
pub struct ReminderPlanner {
    calendar: CalendarService,
    schedule: ReminderSchedule,
}

impl ReminderPlanner {
    /// Create a planner, rejecting offsets larger than `MAX_HEADS_UP_OFFSET_DAYS`
    pub fn new(calendar: CalendarService, schedule: ReminderSchedule) -> BirthdayResult<Self> {
        schedule.validate()?;
        Ok(Self { calendar, schedule })
    }

    pub fn schedule(&self) -> &ReminderSchedule {
        &self.schedule
    }

    pub fn calendar(&self) -> &CalendarService {
        &self.calendar
    }

    /// Compute the day-of and heads-up triggers for the next occurrence whose
    /// triggers both lie strictly after `now`
    pub fn plan_reminders(
        &self,
        birth_date: NaiveDate,
        now: NaiveDateTime,
    ) -> BirthdayResult<ReminderTriggers> {
        let occurrence = self.calendar.next_occurrence(birth_date, now)?;
        let triggers = self.triggers_for(occurrence)?;
        if Self::all_after(&triggers, now) {
            return Ok(triggers);
        }

        let next_cycle = self.calendar.occurrence_in_year(birth_date, occurrence.year() + 1)?;
        let rolled = self.triggers_for(next_cycle)?;
        debug!(
            "Rolled reminders from {} to {}: heads-up {} is not after {}",
            occurrence, next_cycle, triggers.heads_up_trigger, now
        );

        if Self::all_after(&rolled, now) {
            Ok(rolled)
        } else {
            Err(BirthdayError::InvalidSettings(format!(
                "no future reminder triggers for birth date {} with a {}-day heads-up",
                birth_date, self.schedule.heads_up_offset_days
            )))
        }
    }

    /// Plan a record's reminder pair including notification content
    pub fn plan_for_record(
        &self,
        record: &BirthdayRecord,
        now: NaiveDateTime,
    ) -> BirthdayResult<ReminderPlan> {
        let birth_date = self.calendar.parse_birth_date(&record.date)?;
        let triggers = self.plan_reminders(birth_date, now)?;
        let age = triggers.occurrence.year() - birth_date.year();

        Ok(ReminderPlan {
            occurrence: triggers.occurrence,
            day_of: PlannedReminder {
                kind: ReminderKind::DayOf,
                trigger: triggers.day_of_trigger,
                content: self.day_of_content(record, age),
            },
            heads_up: PlannedReminder {
                kind: ReminderKind::HeadsUp,
                trigger: triggers.heads_up_trigger,
                content: self.heads_up_content(record, triggers.occurrence),
            },
        })
    }

    fn triggers_for(&self, occurrence: NaiveDate) -> BirthdayResult<ReminderTriggers> {
        let heads_up_date = self
            .calendar
            .days_before(occurrence, self.schedule.heads_up_offset_days)?;

        Ok(ReminderTriggers {
            occurrence,
            day_of_trigger: occurrence.and_time(self.schedule.day_of_time),
            heads_up_trigger: heads_up_date.and_time(self.schedule.heads_up_time),
        })
    }

    fn all_after(triggers: &ReminderTriggers, now: NaiveDateTime) -> bool {
        triggers.day_of_trigger > now && triggers.heads_up_trigger > now
    }

    fn day_of_content(&self, record: &BirthdayRecord, age: i32) -> NotificationContent {
        let mut body = if age > 0 {
            format!("{} turns {} today. Don't forget to send your wishes!", record.name, age)
        } else {
            format!("Today is {}'s birthday. Don't forget to send your wishes!", record.name)
        };
        if let Some(wish) = record.wish.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
            body.push_str(&format!(" Your message: \"{}\"", wish));
        }

        NotificationContent {
            title: format!("🎉 It's {}'s birthday today!", record.name),
            body,
        }
    }

    fn heads_up_content(
        &self,
        record: &BirthdayRecord,
        occurrence: NaiveDate,
    ) -> NotificationContent {
        let title = match self.schedule.heads_up_offset_days {
            0 => format!("🎁 {}'s birthday is today", record.name),
            1 => format!("🎁 {}'s birthday is tomorrow", record.name),
            days => format!("🎁 {}'s birthday is in {} days", record.name, days),
        };

        let mut body = format!(
            "Get ready to celebrate on {}.",
            self.calendar.format_month_day(occurrence)
        );
        if !record.gift_ideas.is_empty() {
            body.push_str(&format!(" Gift ideas: {}.", record.gift_ideas.join(", ")));
        }

        NotificationContent { title, body }
    }
}
