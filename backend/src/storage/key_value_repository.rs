//! # Key-Value Birthday Repository
//!
//! Keeps the whole birthday collection as a single JSON array under one key
//! of an injected `KeyValueStore`.
//!
//! ```text
//! "birthdays" => [{"id": "birthday::…", "name": "Alice", "date": "2000-03-15", …}, …]
//! ```
//!
//! Every write is a read-modify-write of the full array. Writers must be
//! serialized by the caller.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use shared::BirthdayRecord;
use std::sync::Arc;
use tracing::{debug, info};

use super::traits::{BirthdayStorage, KeyValueStore};

/// Key the birthday collection is stored under
pub const BIRTHDAYS_KEY: &str = "birthdays";

#[derive(Clone)]
pub struct KeyValueBirthdayRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KeyValueBirthdayRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, BIRTHDAYS_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    async fn load_all(&self) -> Result<Vec<BirthdayRecord>> {
        match self.store.get_item(&self.key).await? {
            Some(json) => serde_json::from_str(&json)
                .with_context(|| format!("Corrupt birthday collection under key '{}'", self.key)),
            None => Ok(Vec::new()),
        }
    }

    async fn save_all(&self, birthdays: &[BirthdayRecord]) -> Result<()> {
        let json = serde_json::to_string(birthdays)?;
        self.store.set_item(&self.key, &json).await?;
        debug!("Saved {} birthdays under key '{}'", birthdays.len(), self.key);
        Ok(())
    }
}

#[async_trait]
impl BirthdayStorage for KeyValueBirthdayRepository {
    async fn store_birthday(&self, birthday: &BirthdayRecord) -> Result<()> {
        let mut birthdays = self.load_all().await?;
        if birthdays.iter().any(|b| b.id == birthday.id) {
            return Err(anyhow!("Birthday with ID {} already exists", birthday.id));
        }

        birthdays.push(birthday.clone());
        self.save_all(&birthdays).await?;
        info!("Stored birthday {} ({})", birthday.name, birthday.id);
        Ok(())
    }

    async fn get_birthday(&self, birthday_id: &str) -> Result<Option<BirthdayRecord>> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .find(|b| b.id == birthday_id))
    }

    async fn list_birthdays(&self) -> Result<Vec<BirthdayRecord>> {
        self.load_all().await
    }

    async fn update_birthday(&self, birthday: &BirthdayRecord) -> Result<bool> {
        let mut birthdays = self.load_all().await?;
        let Some(existing) = birthdays.iter_mut().find(|b| b.id == birthday.id) else {
            debug!("No birthday {} to update", birthday.id);
            return Ok(false);
        };

        *existing = birthday.clone();
        self.save_all(&birthdays).await?;
        info!("Updated birthday {} ({})", birthday.name, birthday.id);
        Ok(true)
    }

    async fn delete_birthday(&self, birthday_id: &str) -> Result<bool> {
        let mut birthdays = self.load_all().await?;
        let before = birthdays.len();
        birthdays.retain(|b| b.id != birthday_id);
        if birthdays.len() == before {
            debug!("No birthday {} to delete", birthday_id);
            return Ok(false);
        }

        self.save_all(&birthdays).await?;
        info!("Deleted birthday {}", birthday_id);
        Ok(true)
    }
}
