//! # Birthday Grouper
//!
//! Turns a collection of birthday records into the ordered, bucketed view the
//! home screen renders. The soonest birthday(s) form a first-class `Nearest`
//! group so the UI can highlight them without matching list indices.

use chrono::NaiveDateTime;
use shared::{BirthdayGroup, BirthdayRecord, Bucket, UpcomingBirthday};
use std::collections::BTreeMap;
use tracing::debug;

use super::calendar::CalendarService;
use super::errors::BirthdayResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct BirthdayGrouper {
    calendar: CalendarService,
}

impl BirthdayGrouper {
    pub fn new(calendar: CalendarService) -> Self {
        Self { calendar }
    }

    /// Compute every record's next occurrence, sorted ascending by days until
    /// it. The sort is stable, so ties keep input order.
    pub fn upcoming(
        &self,
        records: &[BirthdayRecord],
        today: NaiveDateTime,
    ) -> BirthdayResult<Vec<UpcomingBirthday>> {
        let mut upcoming = records
            .iter()
            .map(|record| {
                let birth_date = self.calendar.parse_birth_date(&record.date)?;
                let occurrence = self.calendar.occurrence_for(&record.id, birth_date, today)?;
                let next_age = self.calendar.next_age(birth_date, today)?;
                Ok(UpcomingBirthday {
                    record: record.clone(),
                    occurrence,
                    next_age,
                })
            })
            .collect::<BirthdayResult<Vec<_>>>()?;

        upcoming.sort_by_key(|birthday| birthday.occurrence.days_until);
        Ok(upcoming)
    }

    /// Group records into Nearest, ThisWeek, ThisMonth, NextSixMonths and
    /// Later, in that order. Empty buckets are omitted.
    pub fn group(
        &self,
        records: &[BirthdayRecord],
        today: NaiveDateTime,
    ) -> BirthdayResult<Vec<BirthdayGroup>> {
        let upcoming = self.upcoming(records, today)?;
        let Some(min_days_until) = upcoming.first().map(|birthday| birthday.occurrence.days_until)
        else {
            return Ok(Vec::new());
        };

        let mut buckets: BTreeMap<Bucket, Vec<UpcomingBirthday>> = BTreeMap::new();
        for birthday in upcoming {
            let bucket = if birthday.occurrence.days_until == min_days_until {
                Bucket::Nearest
            } else {
                self.calendar
                    .bucket_for(birthday.occurrence.days_until, birthday.occurrence.date, today)
            };
            buckets.entry(bucket).or_default().push(birthday);
        }

        let groups: Vec<BirthdayGroup> = buckets
            .into_iter()
            .map(|(bucket, birthdays)| BirthdayGroup { bucket, birthdays })
            .collect();

        debug!(
            "Grouped {} birthdays into {} buckets (nearest in {} days)",
            records.len(),
            groups.len(),
            min_days_until
        );
        Ok(groups)
    }

    /// Only the birthdays sharing the soonest occurrence
    pub fn nearest(
        &self,
        records: &[BirthdayRecord],
        today: NaiveDateTime,
    ) -> BirthdayResult<Vec<UpcomingBirthday>> {
        Ok(self
            .group(records, today)?
            .into_iter()
            .find(|group| group.bucket == Bucket::Nearest)
            .map(|group| group.birthdays)
            .unwrap_or_default())
    }
}
