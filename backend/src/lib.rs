//! # Birthday Reminder Backend
//!
//! All non-UI logic of the birthday reminder app: when a birthday next
//! occurs, how birthdays are grouped for display, and when the two reminders
//! for each birthday fire.
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (screens, navigation)
//!     ↓
//! Domain Layer (BirthdayService, ReminderLifecycleManager, planner, grouper, calendar)
//!     ↓                              ↓
//! Storage Layer (BirthdayStorage)    IO Layer (Clock, NotificationScheduler)
//! ```
//!
//! The platform supplies the key-value store, the clock and the notification
//! scheduler; the core owns none of them.

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

pub use config::ReminderSettings;
pub use domain::*;
pub use io::*;
pub use storage::*;
