//! # Reminder Settings
//!
//! User-tunable reminder configuration, persisted as YAML by
//! `storage::SettingsRepository`.
//!
//! ## YAML Format
//!
//! ```yaml
//! day_of_time: "09:00"
//! heads_up_offset_days: 1
//! heads_up_time: "18:00"
//! leap_day_policy: feb28
//! data_format_version: "1.0"
//! created_at: "2025-01-21T19:30:00Z"
//! updated_at: "2025-01-21T19:35:00Z"
//! ```

use chrono::{NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::calendar::{CalendarService, LeapDayPolicy};
use crate::domain::errors::BirthdayResult;
use crate::domain::reminder_planner::ReminderSchedule;

pub const SETTINGS_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSettings {
    /// Local time of the birthday-day reminder
    #[serde(with = "hour_minute")]
    pub day_of_time: NaiveTime,
    /// Days before the birthday the heads-up fires
    pub heads_up_offset_days: u32,
    /// Local time of the heads-up reminder
    #[serde(with = "hour_minute")]
    pub heads_up_time: NaiveTime,
    #[serde(default)]
    pub leap_day_policy: LeapDayPolicy,
    pub data_format_version: String,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        let schedule = ReminderSchedule::default();
        let now = Utc::now().to_rfc3339();
        Self {
            day_of_time: schedule.day_of_time,
            heads_up_offset_days: schedule.heads_up_offset_days,
            heads_up_time: schedule.heads_up_time,
            leap_day_policy: LeapDayPolicy::default(),
            data_format_version: SETTINGS_FORMAT_VERSION.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl ReminderSettings {
    pub fn schedule(&self) -> ReminderSchedule {
        ReminderSchedule {
            day_of_time: self.day_of_time,
            heads_up_offset_days: self.heads_up_offset_days,
            heads_up_time: self.heads_up_time,
        }
    }

    pub fn calendar(&self) -> CalendarService {
        CalendarService::with_leap_day_policy(self.leap_day_policy)
    }

    pub fn validate(&self) -> BirthdayResult<()> {
        self.schedule().validate()
    }
}

/// `NaiveTime` as "HH:MM"
mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT)
            .map_err(|e| serde::de::Error::custom(format!("invalid time '{}': {}", raw, e)))
    }
}
