//! Calendar domain logic for the birthday reminder.
//!
//! Pure date arithmetic over yearly-recurring birth dates: the next
//! occurrence of a birth date relative to "today", the number of days until
//! it, the time-horizon bucket it falls into, and ages. Nothing in here reads
//! the system clock; "today" is always passed in so results are
//! deterministic. Inputs are never mutated, every function returns new values.

use chrono::{DateTime, Datelike, Days, FixedOffset, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use shared::{Bucket, Occurrence};

use super::errors::{BirthdayError, BirthdayResult};

/// Upper bound (inclusive) of days until an occurrence for `Bucket::NextSixMonths`
pub const NEXT_SIX_MONTHS_DAYS: i64 = 180;

/// Where a February 29 birthday is observed in years without a February 29
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDayPolicy {
    #[default]
    Feb28,
    Mar1,
}

/// Calendar service that handles all recurring-date calculations
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarService {
    leap_day_policy: LeapDayPolicy,
    /// Zone RFC 3339 timestamps are read in; `None` is the system's local zone
    utc_offset: Option<FixedOffset>,
}

impl CalendarService {
    /// Create a new CalendarService observing leap-day birthdays on February 28
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leap_day_policy(leap_day_policy: LeapDayPolicy) -> Self {
        Self {
            leap_day_policy,
            ..Self::default()
        }
    }

    /// Read RFC 3339 timestamps in a fixed zone instead of the system's local one
    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = Some(utc_offset);
        self
    }

    pub fn leap_day_policy(&self) -> LeapDayPolicy {
        self.leap_day_policy
    }

    /// Parse a stored birth date.
    ///
    /// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive
    /// `YYYY-MM-DDTHH:MM:SS` timestamps. An RFC 3339 timestamp is an instant
    /// (records written as UTC midnight of the picked day), so its calendar
    /// date is taken in the local zone the clock runs in.
    pub fn parse_birth_date(&self, raw: &str) -> BirthdayResult<NaiveDate> {
        let raw = raw.trim();

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            let local_date = match self.utc_offset {
                Some(offset) => timestamp.with_timezone(&offset).date_naive(),
                None => timestamp.with_timezone(&Local).date_naive(),
            };
            return Ok(local_date);
        }
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(timestamp.date());
        }

        Err(BirthdayError::InvalidDate(format!(
            "'{}' is not a valid YYYY-MM-DD date or RFC 3339 timestamp",
            raw
        )))
    }

    /// Build a birth date from numeric components
    pub fn birth_date_from_ymd(
        &self,
        year: i32,
        month: u32,
        day: u32,
    ) -> BirthdayResult<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            BirthdayError::InvalidDate(format!(
                "{:04}-{:02}-{:02} is not a calendar date",
                year, month, day
            ))
        })
    }

    /// The date the birthday falls on in `year`, applying the leap-day policy
    pub fn occurrence_in_year(
        &self,
        birth_date: NaiveDate,
        year: i32,
    ) -> BirthdayResult<NaiveDate> {
        let is_leap_day = birth_date.month() == 2 && birth_date.day() == 29;
        let (month, day) = if is_leap_day && !self.is_leap_year(year) {
            match self.leap_day_policy {
                LeapDayPolicy::Feb28 => (2, 28),
                LeapDayPolicy::Mar1 => (3, 1),
            }
        } else {
            (birth_date.month(), birth_date.day())
        };

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            BirthdayError::InvalidDate(format!(
                "year {} is outside the supported calendar range",
                year
            ))
        })
    }

    /// Next occurrence of the birth date on or after the start of `today`
    pub fn next_occurrence(
        &self,
        birth_date: NaiveDate,
        today: NaiveDateTime,
    ) -> BirthdayResult<NaiveDate> {
        let start_of_today = today.date();
        let this_year = self.occurrence_in_year(birth_date, start_of_today.year())?;

        if this_year < start_of_today {
            self.occurrence_in_year(birth_date, start_of_today.year() + 1)
        } else {
            Ok(this_year)
        }
    }

    /// Calendar days from the start of `today` to the next occurrence (0 = today)
    pub fn days_until(&self, birth_date: NaiveDate, today: NaiveDateTime) -> BirthdayResult<i64> {
        let occurrence = self.next_occurrence(birth_date, today)?;
        Ok((occurrence - today.date()).num_days())
    }

    /// Compute the derived occurrence of a record's birthday
    pub fn occurrence_for(
        &self,
        record_id: &str,
        birth_date: NaiveDate,
        today: NaiveDateTime,
    ) -> BirthdayResult<Occurrence> {
        let date = self.next_occurrence(birth_date, today)?;
        Ok(Occurrence {
            record_id: record_id.to_string(),
            date,
            days_until: (date - today.date()).num_days(),
        })
    }

    /// Classify an occurrence into a time-horizon bucket.
    ///
    /// Never returns `Bucket::Nearest`; nearest is relative to a whole
    /// collection and decided by the grouper. Weeks start on Monday.
    pub fn bucket_for(
        &self,
        days_until: i64,
        occurrence: NaiveDate,
        today: NaiveDateTime,
    ) -> Bucket {
        let start_of_today = today.date();
        let days_left_in_week = 6 - i64::from(start_of_today.weekday().num_days_from_monday());

        if (0..=days_left_in_week).contains(&days_until) {
            Bucket::ThisWeek
        } else if occurrence.year() == start_of_today.year()
            && occurrence.month() == start_of_today.month()
        {
            Bucket::ThisMonth
        } else if days_until <= NEXT_SIX_MONTHS_DAYS {
            Bucket::NextSixMonths
        } else {
            Bucket::Later
        }
    }

    /// Age the person turns at the next occurrence (0 for a birth date that is today)
    pub fn next_age(&self, birth_date: NaiveDate, today: NaiveDateTime) -> BirthdayResult<i32> {
        let occurrence = self.next_occurrence(birth_date, today)?;
        Ok(occurrence.year() - birth_date.year())
    }

    /// Completed years on `today`: year difference, minus one while this
    /// year's birthday has not yet occurred
    pub fn age_on(&self, birth_date: NaiveDate, today: NaiveDateTime) -> i32 {
        let today = today.date();
        let years = today.year() - birth_date.year();
        if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
            years - 1
        } else {
            years
        }
    }

    /// The date `days` calendar days before `date`
    pub fn days_before(&self, date: NaiveDate, days: u32) -> BirthdayResult<NaiveDate> {
        date.checked_sub_days(Days::new(u64::from(days))).ok_or_else(|| {
            BirthdayError::InvalidDate(format!("{} minus {} days is out of range", date, days))
        })
    }

    /// Check if a year is a leap year
    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Get the human-readable name for a month number
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Invalid Month",
        }
    }

    /// Format a date as month and ordinal day, e.g. "March 15th"
    pub fn format_month_day(&self, date: NaiveDate) -> String {
        let day = date.day();
        let suffix = match (day % 10, day % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        format!("{} {}{}", self.month_name(date.month()), day, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").unwrap()
    }

    fn hours_east(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn test_parse_birth_date_formats() {
        let calendar = CalendarService::new().with_utc_offset(hours_east(0));

        assert_eq!(calendar.parse_birth_date("2000-03-15").unwrap(), date("2000-03-15"));
        assert_eq!(calendar.parse_birth_date(" 2000-03-15 ").unwrap(), date("2000-03-15"));
        assert_eq!(
            calendar.parse_birth_date("2000-03-15T10:30:00.000Z").unwrap(),
            date("2000-03-15")
        );
        assert_eq!(
            calendar.parse_birth_date("2000-03-15T18:30:00-05:00").unwrap(),
            date("2000-03-15")
        );
        assert_eq!(
            calendar.parse_birth_date("2000-03-15T08:00:00").unwrap(),
            date("2000-03-15")
        );
    }

    #[test]
    fn test_parse_timestamp_uses_local_calendar_day() {
        // Picked as March 15 west of UTC, stored as the UTC instant
        let new_york = CalendarService::new().with_utc_offset(hours_east(-5));
        assert_eq!(
            new_york.parse_birth_date("2000-03-16T01:00:00.000Z").unwrap(),
            date("2000-03-15")
        );

        // Midnight local east of UTC is the previous day in UTC
        let tokyo = CalendarService::new().with_utc_offset(hours_east(9));
        assert_eq!(
            tokyo.parse_birth_date("2000-03-14T15:00:00.000Z").unwrap(),
            date("2000-03-15")
        );

        // Date-only and naive values are already local
        assert_eq!(new_york.parse_birth_date("2000-03-16").unwrap(), date("2000-03-16"));
        assert_eq!(
            tokyo.parse_birth_date("2000-03-16T01:00:00").unwrap(),
            date("2000-03-16")
        );
    }

    #[test]
    fn test_parse_birth_date_rejects_invalid() {
        let calendar = CalendarService::new();

        for raw in ["", "invalid-date", "2015-13-15", "2015-02-30", "2001-02-29", "15/03/2000"] {
            let result = calendar.parse_birth_date(raw);
            assert!(
                matches!(result, Err(BirthdayError::InvalidDate(_))),
                "expected InvalidDate for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_birth_date_from_ymd() {
        let calendar = CalendarService::new();
        assert_eq!(calendar.birth_date_from_ymd(2000, 2, 29).unwrap(), date("2000-02-29"));
        assert!(matches!(
            calendar.birth_date_from_ymd(2000, 4, 31),
            Err(BirthdayError::InvalidDate(_))
        ));
        assert!(calendar.birth_date_from_ymd(2000, 0, 1).is_err());
    }

    #[test]
    fn test_next_occurrence_later_this_year() {
        let calendar = CalendarService::new();
        let occurrence = calendar
            .next_occurrence(date("2000-03-15"), at("2024-03-10 08:00"))
            .unwrap();
        assert_eq!(occurrence, date("2024-03-15"));
    }

    #[test]
    fn test_next_occurrence_today_is_not_rolled_over() {
        let calendar = CalendarService::new();
        // Late in the day still counts as today
        let occurrence = calendar
            .next_occurrence(date("2000-03-10"), at("2024-03-10 23:59"))
            .unwrap();
        assert_eq!(occurrence, date("2024-03-10"));
        assert_eq!(calendar.days_until(date("2000-03-10"), at("2024-03-10 23:59")).unwrap(), 0);
    }

    #[test]
    fn test_next_occurrence_wraps_to_next_year() {
        let calendar = CalendarService::new();
        let occurrence = calendar
            .next_occurrence(date("1995-01-02"), at("2024-12-31 12:00"))
            .unwrap();
        assert_eq!(occurrence, date("2025-01-02"));
        assert_eq!(calendar.days_until(date("1995-01-02"), at("2024-12-31 12:00")).unwrap(), 2);

        let yesterday = calendar

            .next_occurrence(date("1995-03-09"), at("2024-03-10 00:00"))

            .unwrap();
        assert_eq!(yesterday, date("2025-03-09"));
    }

    #[test]
    fn test_leap_day_in_non_leap_year_observed_feb_28() {
        let calendar = CalendarService::new();
        let occurrence = calendar
            .next_occurrence(date("2000-02-29"), at("2025-01-15 09:00"))
            .unwrap();
        assert_eq!(occurrence, date("2025-02-28"));
    }

    #[test]
    fn test_leap_day_after_observed_date_rolls_to_next_year() {
        let calendar = CalendarService::new();
        // 2025-02-28 has already passed on 2025-03-01; 2026 is not a leap year either
        let occurrence = calendar
            .next_occurrence(date("2000-02-29"), at("2025-03-01 09:00"))
            .unwrap();
        assert_eq!(occurrence, date("2026-02-28"));

        let leap = calendar.next_occurrence(date("2000-02-29"), at("2027-03-01 09:00")).unwrap();
        assert_eq!(leap, date("2028-02-29"));
    }

    #[test]
    fn test_leap_day_observed_march_1() {
        let calendar = CalendarService::with_leap_day_policy(LeapDayPolicy::Mar1);
        assert_eq!(calendar.leap_day_policy(), LeapDayPolicy::Mar1);

        let occurrence = calendar

            .next_occurrence(date("2000-02-29"), at("2025-02-28 09:00"))

            .unwrap();
        assert_eq!(occurrence, date("2025-03-01"));

        let on_the_day = calendar

            .next_occurrence(date("2000-02-29"), at("2025-03-01 20:00"))

            .unwrap();
        assert_eq!(on_the_day, date("2025-03-01"));
    }

    #[test]
    fn test_occurrence_never_before_today() {
        let calendar = CalendarService::new();
        let birth_dates = ["2000-01-01", "2000-02-29", "1988-03-10", "1970-06-30", "2010-12-31"];
        let mut today = date("2023-01-01").and_hms_opt(13, 45, 0).unwrap();
        while today.date() <= date("2025-01-10") {
            for raw in birth_dates {
                let birth_date = date(raw);
                let occurrence = calendar.next_occurrence(birth_date, today).unwrap();
                let days_until = calendar.days_until(birth_date, today).unwrap();
                assert!(occurrence >= today.date(), "{} on {}", raw, today);
                assert!(days_until >= 0);
                assert!(days_until <= 366);
            }
            today += chrono::Duration::days(1);
        }
    }

    #[test]
    fn test_occurrence_for_record() {
        let calendar = CalendarService::new();
        let occurrence = calendar
            .occurrence_for("birthday::1", date("2000-03-15"), at("2024-03-10 10:00"))
            .unwrap();
        assert_eq!(occurrence.record_id, "birthday::1");
        assert_eq!(occurrence.date, date("2024-03-15"));
        assert_eq!(occurrence.days_until, 5);
    }

    #[test]
    fn test_bucket_for_week_boundary() {
        let calendar = CalendarService::new();
        // 2024-03-10 is a Sunday: the week that started Monday 03-04 ends today
        let today = at("2024-03-10 10:00");
        assert_eq!(calendar.bucket_for(0, date("2024-03-10"), today), Bucket::ThisWeek);
        assert_eq!(calendar.bucket_for(5, date("2024-03-15"), today), Bucket::ThisMonth);

        // Monday: the whole week lies ahead
        let monday = at("2024-03-11 10:00");
        assert_eq!(calendar.bucket_for(6, date("2024-03-17"), monday), Bucket::ThisWeek);
        assert_eq!(calendar.bucket_for(7, date("2024-03-18"), monday), Bucket::ThisMonth);
    }

    #[test]
    fn test_bucket_for_horizons() {
        let calendar = CalendarService::new();
        let today = at("2024-03-28 10:00"); // Thursday

        // Next week but next month
        assert_eq!(calendar.bucket_for(5, date("2024-04-02"), today), Bucket::NextSixMonths);
        assert_eq!(calendar.bucket_for(180, date("2024-09-24"), today), Bucket::NextSixMonths);
        assert_eq!(calendar.bucket_for(181, date("2024-09-25"), today), Bucket::Later);
        assert_eq!(calendar.bucket_for(2, date("2024-03-30"), today), Bucket::ThisWeek);
    }

    #[test]
    fn test_bucket_for_same_month_next_year_is_not_this_month() {
        let calendar = CalendarService::new();
        let today = at("2024-03-20 10:00");
        // Birthday already passed this March, next one is a year away
        assert_eq!(calendar.bucket_for(360, date("2025-03-15"), today), Bucket::Later);
    }

    #[test]
    fn test_next_age_and_age_on() {
        let calendar = CalendarService::new();
        let birth_date = date("2000-03-15");

        assert_eq!(calendar.next_age(birth_date, at("2024-03-10 10:00")).unwrap(), 24);
        assert_eq!(calendar.age_on(birth_date, at("2024-03-10 10:00")), 23);

        assert_eq!(calendar.next_age(birth_date, at("2024-03-15 10:00")).unwrap(), 24);
        assert_eq!(calendar.age_on(birth_date, at("2024-03-15 10:00")), 24);

        assert_eq!(calendar.next_age(birth_date, at("2024-03-16 10:00")).unwrap(), 25);
        assert_eq!(calendar.age_on(birth_date, at("2024-03-16 10:00")), 24);
    }

    #[test]
    fn test_days_before() {
        let calendar = CalendarService::new();
        assert_eq!(calendar.days_before(date("2024-03-01"), 1).unwrap(), date("2024-02-29"));
        assert_eq!(calendar.days_before(date("2024-01-01"), 0).unwrap(), date("2024-01-01"));
    }

    #[test]
    fn test_leap_years() {
        let calendar = CalendarService::new();
        assert!(calendar.is_leap_year(2024));
        assert!(calendar.is_leap_year(2000));
        assert!(!calendar.is_leap_year(1900));
        assert!(!calendar.is_leap_year(2025));
    }

    #[test]
    fn test_format_month_day() {
        let calendar = CalendarService::new();
        assert_eq!(calendar.format_month_day(date("2024-03-15")), "March 15th");
        assert_eq!(calendar.format_month_day(date("2024-01-01")), "January 1st");
        assert_eq!(calendar.format_month_day(date("2024-05-22")), "May 22nd");
        assert_eq!(calendar.format_month_day(date("2024-07-23")), "July 23rd");
        assert_eq!(calendar.format_month_day(date("2024-12-11")), "December 11th");
        assert_eq!(calendar.format_month_day(date("2024-12-13")), "December 13th");
        assert_eq!(calendar.format_month_day(date("2024-08-31")), "August 31st");
    }
}
