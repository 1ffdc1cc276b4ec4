use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used by the legacy single-string gift idea format
pub const LEGACY_GIFT_IDEA_SEPARATOR: char = '|';

/// A stored birthday. Ownership of `reminder_handles` belongs to the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthdayRecord {
    /// Opaque identifier, stable for the lifetime of the record
    pub id: String,
    /// Display label, never empty
    pub name: String,
    /// Birth date as entered: `YYYY-MM-DD` or an RFC 3339 timestamp
    pub date: String,
    /// Avatar reference (asset URI)
    #[serde(default)]
    pub avatar: String,
    /// Pre-written birthday message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wish: Option<String>,
    #[serde(default)]
    pub gift_ideas: Vec<String>,
    /// Both reminder handles, or none at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_handles: Option<ReminderHandles>,
}

impl BirthdayRecord {
    /// Generate a new record ID in format "birthday::<uuid>"
    pub fn generate_id() -> String {
        format!("birthday::{}", uuid::Uuid::new_v4())
    }

    /// Current reminder state as seen from outside any in-flight operation;
    /// never a transient state
    pub fn reminder_state(&self) -> ReminderState {
        match self.reminder_handles {
            Some(_) => ReminderState::Scheduled,
            None => ReminderState::Unscheduled,
        }
    }

    /// Gift ideas joined into the legacy pipe-separated form
    pub fn legacy_gift_ideas(&self) -> String {
        self.gift_ideas.join(&LEGACY_GIFT_IDEA_SEPARATOR.to_string())
    }

    /// Split a legacy pipe-separated gift idea string, dropping blank entries
    pub fn gift_ideas_from_legacy(raw: &str) -> Vec<String> {
        raw.split(LEGACY_GIFT_IDEA_SEPARATOR)
            .map(str::trim)
            .filter(|idea| !idea.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Opaque token returned by the notification scheduler
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationHandle(pub String);

impl NotificationHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The day-of and heads-up reminder handles, always scheduled as a pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderHandles {
    pub day_of: NotificationHandle,
    pub heads_up: NotificationHandle,
    /// Occurrence the pair was planned for; `None` for records written before it was tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDate>,
}

/// Lifecycle of a record's reminder pair.
///
/// `Scheduling` and `Canceling` only exist while a schedule or cancel call is
/// running, which the caller serializes per record. They are reported in logs
/// and never stored, so a record read back is always `Unscheduled` or
/// `Scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderState {
    Unscheduled,
    /// Submissions in flight
    Scheduling,
    Scheduled,
    /// Cancellations in flight
    Canceling,
}

impl ReminderState {
    /// True for the states a call passes through, never seen on a stored record
    pub fn is_transient(&self) -> bool {
        matches!(self, ReminderState::Scheduling | ReminderState::Canceling)
    }
}

impl fmt::Display for ReminderState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            ReminderState::Unscheduled => "unscheduled",
            ReminderState::Scheduling => "scheduling",
            ReminderState::Scheduled => "scheduled",
            ReminderState::Canceling => "canceling",
        };
        write!(f, "{}", label)
    }
}

/// Time-horizon grouping used to order birthdays for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bucket {
    /// Every birthday sharing the soonest occurrence in the collection
    Nearest,
    ThisWeek,
    ThisMonth,
    NextSixMonths,
    Later,
}

impl Bucket {
    /// Display order of buckets
    pub const ORDER: [Bucket; 5] = [
        Bucket::Nearest,
        Bucket::ThisWeek,
        Bucket::ThisMonth,
        Bucket::NextSixMonths,
        Bucket::Later,
    ];

    /// Human-readable section title
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Nearest => "Up Next",
            Bucket::ThisWeek => "This Week",
            Bucket::ThisMonth => "This Month",
            Bucket::NextSixMonths => "Next 6 Months",
            Bucket::Later => "Later",
        }
    }
}

/// The next concrete date a record's birthday falls on. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub record_id: String,
    pub date: NaiveDate,
    /// Calendar days from today (0 = today)
    pub days_until: i64,
}

/// A record together with its computed next occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingBirthday {
    pub record: BirthdayRecord,
    pub occurrence: Occurrence,
    /// Age the person turns on `occurrence.date`
    pub next_age: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthdayGroup {
    pub bucket: Bucket,
    /// Ascending `days_until`, ties keep input order
    pub birthdays: Vec<UpcomingBirthday>,
}

/// Title and body of a local notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBirthdayRequest {
    pub name: String,
    /// `YYYY-MM-DD` or RFC 3339
    pub date: String,
    #[serde(default)]
    pub avatar: String,
    pub wish: Option<String>,
    #[serde(default)]
    pub gift_ideas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBirthdayResponse {
    pub birthday: BirthdayRecord,
    pub success_message: String,
}

/// Partial update; `None` leaves a field untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBirthdayRequest {
    pub id: String,
    pub name: Option<String>,
    pub date: Option<String>,
    pub avatar: Option<String>,
    /// `Some("")` clears the wish
    pub wish: Option<String>,
    pub gift_ideas: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBirthdayResponse {
    pub birthday: BirthdayRecord,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingBirthdaysResponse {
    pub groups: Vec<BirthdayGroup>,
    /// Wall-clock instant the grouping was computed for
    pub generated_at: NaiveDateTime,
}
