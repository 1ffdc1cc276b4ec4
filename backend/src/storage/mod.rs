//! # Storage Module
//!
//! Persistence seams for the birthday reminder core. The core never reaches
//! into a storage format itself: records move through the `BirthdayStorage`
//! trait and the app injects the underlying key-value store.
//!
//! - **traits**: `BirthdayStorage` and `KeyValueStore` abstractions
//! - **key_value_repository**: birthday collection kept as one JSON document
//! - **memory**: in-process `KeyValueStore`
//! - **settings_repository**: YAML-backed reminder settings

pub mod key_value_repository;
pub mod memory;
pub mod settings_repository;
pub mod traits;

pub use key_value_repository::{KeyValueBirthdayRepository, BIRTHDAYS_KEY};
pub use memory::InMemoryKeyValueStore;
pub use settings_repository::SettingsRepository;
pub use traits::{BirthdayStorage, KeyValueStore};
