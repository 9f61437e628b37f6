//! TOML-backed settings store.

use super::paths::get_config_dir;
use crate::kernel::services::ports::fs::FileSystem;
use crate::kernel::services::ports::settings::{ConfigGateway, Settings, SettingsError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

pub const SETTINGS_FILE: &str = "config.toml";

const BANNER: &str = "\
# xide configuration
#
# Missing keys fall back to their defaults.
# Themes: min-light, houston, github-light, github-dark
";

pub struct SettingsStore {
    fs: Arc<dyn FileSystem>,
    dir: Option<PathBuf>,
    settings: RwLock<Settings>,
}

impl SettingsStore {
    /// Store rooted at the per-user config directory.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_dir(fs, get_config_dir())
    }

    pub fn with_dir(fs: Arc<dyn FileSystem>, dir: Option<PathBuf>) -> Self {
        Self {
            fs,
            dir,
            settings: RwLock::new(Settings::default()),
        }
    }

    /// Loads the file (creating it with defaults when missing), then writes the merged result back.
    pub async fn init(&self) -> Result<Settings, SettingsError> {
        let settings = self.restore().await?;
        self.persist().await?;
        Ok(settings)
    }

    pub async fn restore(&self) -> Result<Settings, SettingsError> {
        let path = self.settings_path().await?;
        if !self.fs.exists(&path).await {
            tracing::info!(path = %path.display(), "writing default settings");
            self.write(&Settings::default()).await?;
        }

        let raw = self.fs.read_text_file(&path).await?;
        let settings: Settings = toml::from_str(&raw)?;
        settings.validate()?;
        self.replace(settings.clone());
        tracing::debug!(path = %path.display(), "settings restored");
        Ok(settings)
    }

    pub async fn persist(&self) -> Result<(), SettingsError> {
        let settings = self.settings();
        self.write(&settings).await
    }

    /// Validates, swaps in and writes `settings`.
    pub async fn update(&self, settings: Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.replace(settings);
        self.persist().await
    }

    async fn write(&self, settings: &Settings) -> Result<(), SettingsError> {
        let path = self.settings_path().await?;
        let body = toml::to_string_pretty(settings)?;
        self.fs
            .write_text_file(&path, &format!("{BANNER}\n{body}"))
            .await?;
        Ok(())
    }

    fn replace(&self, settings: Settings) {
        match self.settings.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
    }
}

#[async_trait]
impl ConfigGateway for SettingsStore {
    async fn settings_path(&self) -> Result<PathBuf, SettingsError> {
        let dir = self.dir.as_ref().ok_or(SettingsError::NoConfigDir)?;
        if !self.fs.exists(dir).await {
            self.fs.mkdir(dir).await?;
        }
        Ok(dir.join(SETTINGS_FILE))
    }

    fn settings(&self) -> Settings {
        match self.settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
