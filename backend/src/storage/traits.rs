//! # Storage Traits
//!
//! Storage abstractions that let different backends be used interchangeably
//! in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use shared::BirthdayRecord;

/// Interface for birthday record storage operations
#[async_trait]
pub trait BirthdayStorage: Send + Sync {
    /// Store a new birthday; fails if the ID is already taken
    async fn store_birthday(&self, birthday: &BirthdayRecord) -> Result<()>;

    /// Retrieve a specific birthday by ID
    async fn get_birthday(&self, birthday_id: &str) -> Result<Option<BirthdayRecord>>;

    /// List all birthdays in insertion order
    async fn list_birthdays(&self) -> Result<Vec<BirthdayRecord>>;

    /// Replace an existing birthday
    /// Returns true if the birthday was found and updated, false otherwise
    async fn update_birthday(&self, birthday: &BirthdayRecord) -> Result<bool>;

    /// Delete a birthday by ID
    /// Returns true if the birthday was found and deleted, false otherwise
    async fn delete_birthday(&self, birthday_id: &str) -> Result<bool>;
}

/// String key-value store provided by the platform (e.g. the device's app storage)
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    async fn remove_item(&self, key: &str) -> Result<()>;
}
