//! Shared fixtures for domain tests.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{BirthdayRecord, NotificationContent, NotificationHandle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::io::{CancelOutcome, NotificationScheduler, SchedulerError};

pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").unwrap()
}

pub fn record(name: &str, date: &str) -> BirthdayRecord {
    BirthdayRecord {
        id: format!("birthday::{}", name.to_lowercase()),
        name: name.to_string(),
        date: date.to_string(),
        avatar: String::new(),
        wish: None,
        gift_ideas: Vec::new(),
        reminder_handles: None,
    }
}

#[derive(Default)]
struct FakeSchedulerState {
    next_id: u32,
    live: HashMap<NotificationHandle, (NaiveDateTime, NotificationContent)>,
    submissions: u32,
    cancellations: Vec<NotificationHandle>,
    fail_on_submission: Option<u32>,
    fail_cancellations: bool,
}

/// In-memory scheduler that records every call and can be told to fail
#[derive(Clone, Default)]
pub struct FakeScheduler {
    state: Arc<Mutex<FakeSchedulerState>>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `n`th submission (1-based), counted from creation
    pub fn failing_on_submission(n: u32) -> Self {
        let scheduler = Self::new();
        scheduler.state.lock().unwrap().fail_on_submission = Some(n);
        scheduler
    }

    pub fn fail_cancellations(&self, fail: bool) {
        self.state.lock().unwrap().fail_cancellations = fail;
    }

    pub fn fail_on_submission(&self, n: Option<u32>) {
        let mut state = self.state.lock().unwrap();
        let submitted = state.submissions;
        state.fail_on_submission = n.map(|n| submitted + n);
    }

    pub fn live_count(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    pub fn is_live(&self, handle: &NotificationHandle) -> bool {
        self.state.lock().unwrap().live.contains_key(handle)
    }

    pub fn live_trigger(&self, handle: &NotificationHandle) -> Option<NaiveDateTime> {
        self.state.lock().unwrap().live.get(handle).map(|(trigger, _)| *trigger)
    }

    pub fn live_content(&self, handle: &NotificationHandle) -> Option<NotificationContent> {
        self.state.lock().unwrap().live.get(handle).map(|(_, content)| content.clone())
    }

    pub fn submissions(&self) -> u32 {
        self.state.lock().unwrap().submissions
    }

    pub fn cancellations(&self) -> Vec<NotificationHandle> {
        self.state.lock().unwrap().cancellations.clone()
    }

    /// Simulate the platform delivering a notification
    pub fn fire(&self, handle: &NotificationHandle) {
        self.state.lock().unwrap().live.remove(handle);
    }
}

#[async_trait]
impl NotificationScheduler for FakeScheduler {
    async fn submit(
        &self,
        trigger: NaiveDateTime,
        content: &NotificationContent,
    ) -> Result<NotificationHandle, SchedulerError> {
        let mut state = self.state.lock().unwrap();
        state.submissions += 1;
        if state.fail_on_submission == Some(state.submissions) {
            return Err(SchedulerError::Rejected("quota exceeded".to_string()));
        }

        state.next_id += 1;
        let handle = NotificationHandle::new(format!("notification-{}", state.next_id));
        state.live.insert(handle.clone(), (trigger, content.clone()));
        Ok(handle)
    }

    async fn cancel(&self, handle: &NotificationHandle) -> Result<CancelOutcome, SchedulerError> {
        let mut state = self.state.lock().unwrap();
        state.cancellations.push(handle.clone());
        if state.fail_cancellations {
            return Err(SchedulerError::Rejected("scheduler unavailable".to_string()));
        }

        match state.live.remove(handle) {
            Some(_) => Ok(CancelOutcome::Canceled),
            None => Ok(CancelOutcome::StaleHandle),
        }
    }
}
