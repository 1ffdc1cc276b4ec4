//! # Settings Repository
//!
//! File-based storage of `ReminderSettings` in a single YAML file,
//! `reminder_settings.yaml`, at the root of the data directory.
//!
//! ```text
//! data/
//! └── reminder_settings.yaml    ← This module manages this file
//! ```
//!
//! Writes go to a temp file first and are renamed into place.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ReminderSettings;

pub const SETTINGS_FILE_NAME: &str = "reminder_settings.yaml";

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    base_directory: PathBuf,
}

impl SettingsRepository {
    /// Create a repository rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            fs::create_dir_all(&base_directory)?;
            info!("Created settings directory {:?}", base_directory);
        }
        Ok(Self { base_directory })
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_directory.join(SETTINGS_FILE_NAME)
    }

    /// Load settings from file, creating the default file if it doesn't exist
    pub fn load_or_create(&self) -> Result<ReminderSettings> {
        let path = self.settings_path();

        if path.exists() {
            let yaml_content = fs::read_to_string(&path)?;
            let settings: ReminderSettings = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Failed to parse {:?}", path))?;
            settings.validate()?;
            debug!("Loaded reminder settings from {:?}", path);
            Ok(settings)
        } else {
            let settings = ReminderSettings::default();
            self.save(&settings)?;
            info!("Created default reminder settings at {:?}", path);
            Ok(settings)
        }
    }

    /// Validate, stamp `updated_at` and persist
    pub fn update(&self, settings: &ReminderSettings) -> Result<ReminderSettings> {
        settings.validate()?;
        let mut updated = settings.clone();
        updated.updated_at = Utc::now().to_rfc3339();
        self.save(&updated)?;
        info!(
            "Updated reminder settings: day-of {}, heads-up {} day(s) before at {}",
            updated.day_of_time.format("%H:%M"),
            updated.heads_up_offset_days,
            updated.heads_up_time.format("%H:%M")
        );
        Ok(updated)
    }

    fn save(&self, settings: &ReminderSettings) -> Result<()> {
        let path = self.settings_path();
        let yaml_content = serde_yaml::to_string(settings)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &path)?;

        debug!("Saved reminder settings to {:?}", path);
        Ok(())
    }
}
