//! # Domain Module
//!
//! Business logic of the birthday reminder: recurring-date arithmetic,
//! reminder planning, display grouping and the reminder lifecycle. It works
//! against the storage and io traits and never touches a concrete platform.
//!
//! ## Module Organization
//!
//! - **calendar**: next occurrence, days until, buckets and ages
//! - **reminder_planner**: day-of and heads-up trigger derivation with rollover
//! - **birthday_grouper**: Nearest / ThisWeek / ThisMonth / NextSixMonths / Later view
//! - **reminder_lifecycle**: atomic schedule / cancel / reschedule of reminder pairs
//! - **birthday_service**: add / update / delete flows tying storage and reminders together
//!
//! ## Business Rules
//!
//! - A record holds either both reminder handles or none
//! - Every trigger handed to the scheduler lies strictly in the future
//! - February 29 birthdays are observed on February 28 in common years unless
//!   configured otherwise
//! - "Now" is always passed in; nothing here reads the system clock

pub mod birthday_grouper;
pub mod birthday_service;
pub mod calendar;
pub mod errors;
pub mod reminder_lifecycle;
pub mod reminder_planner;

#[cfg(test)]
pub(crate) mod test_utils;

pub use birthday_grouper::*;
pub use birthday_service::*;
pub use calendar::*;
pub use errors::*;
pub use reminder_lifecycle::*;
pub use reminder_planner::*;
