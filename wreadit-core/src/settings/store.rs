use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::content::PostTypeRegistry;

use super::config::{PartialSettings, Settings};
use super::validate::{self, FieldError};

/// Persistence boundary for settings. The host decides where the record
/// lives; the core assumes nothing beyond single read and write calls.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<PartialSettings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// TOML-file settings store for hosts without their own option storage.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at the default location (~/.wreadit/settings.toml).
    pub fn new() -> Result<Self> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }
        Ok(Self { path })
    }

    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".wreadit").join("settings.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Result<PartialSettings> {
        if !self.path.exists() {
            return Ok(PartialSettings::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {:?}", self.path))?;

        match toml::from_str(&contents) {
            Ok(partial) => Ok(partial),
            Err(_) => {
                // Move the unreadable file aside and start over from defaults.
                let backup_path = self.path.with_extension("toml.backup");
                fs::rename(&self.path, &backup_path).with_context(|| {
                    format!("Failed to back up corrupted settings to {backup_path:?}")
                })?;
                tracing::warn!(
                    "settings file could not be parsed; moved to {:?}",
                    backup_path
                );
                Ok(PartialSettings::default())
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }

        let contents =
            toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))?;

        Ok(())
    }
}

/// Loads, validates, and saves the plugin settings.
///
/// A submission is merged over the defaults and stored even when validation
/// finds problems; the errors are returned for the host to display. A
/// half-configured site keeps its progress instead of losing the fields
/// that were fine.
pub struct SettingsManager<S> {
    store: S,
}

impl<S: SettingsStore> SettingsManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current settings with defaults backfilled for any missing field.
    pub fn settings(&self) -> Result<Settings> {
        Ok(Settings::merged(&self.store.load()?))
    }

    /// Validates and persists a submission, returning the stored value
    /// together with every field error found. Errors do not block the
    /// write.
    pub fn submit(
        &self,
        input: &PartialSettings,
        post_types: &dyn PostTypeRegistry,
    ) -> Result<(Settings, Vec<FieldError>)> {
        let errors = validate::validate(input, post_types);
        if !errors.is_empty() {
            tracing::warn!(
                count = errors.len(),
                "storing settings despite validation errors"
            );
        }

        let merged = Settings::merged(input);
        self.store.save(&merged)?;
        Ok((merged, errors))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
