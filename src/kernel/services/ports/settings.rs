use super::fs::FileError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Theme names the highlighter ships with.
pub const BUILTIN_THEMES: &[&str] = &["min-light", "houston", "github-light", "github-dark"];

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot determine the settings directory")]
    NoConfigDir,
    #[error("settings file error: {0}")]
    File(#[from] FileError),
    #[error("settings file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid setting `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub editor: EditorSettings,
    pub ai: AiSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub font_size: u16,
    pub theme_mode: ThemeMode,
    pub light_theme: String,
    pub dark_theme: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            font_size: 14,
            theme_mode: ThemeMode::System,
            light_theme: "min-light".to_string(),
            dark_theme: "houston".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub agent: AgentSettings,
    pub autocomplete: AutocompleteSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub enabled: bool,
    pub model: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "github-copilot/gpt-4.1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteSettings {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "mistralai/codestral-2501".to_string(),
            api_key: String::new(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.editor.font_size == 0 {
            return Err(SettingsError::Invalid {
                field: "editor.font_size",
                message: "must be greater than zero".to_string(),
            });
        }
        for (field, theme) in [
            ("editor.light_theme", &self.editor.light_theme),
            ("editor.dark_theme", &self.editor.dark_theme),
        ] {
            if !BUILTIN_THEMES.contains(&theme.as_str()) {
                return Err(SettingsError::Invalid {
                    field,
                    message: format!("unknown theme `{theme}`"),
                });
            }
        }

        let base_url = &self.ai.autocomplete.base_url;
        match url::Url::parse(base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            Ok(url) => Err(SettingsError::Invalid {
                field: "ai.autocomplete.base_url",
                message: format!("unsupported scheme `{}`", url.scheme()),
            }),
            Err(e) => Err(SettingsError::Invalid {
                field: "ai.autocomplete.base_url",
                message: e.to_string(),
            }),
        }
    }

    /// Theme name to use given the OS appearance.
    pub fn effective_theme(&self, system_prefers_dark: bool) -> &str {
        let dark = match self.editor.theme_mode {
            ThemeMode::System => system_prefers_dark,
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
        };
        if dark {
            &self.editor.dark_theme
        } else {
            &self.editor.light_theme
        }
    }
}

/// Source of validated settings and of the settings file location.
#[async_trait]
pub trait ConfigGateway: Send + Sync {
    async fn settings_path(&self) -> Result<PathBuf, SettingsError>;

    fn settings(&self) -> Settings;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
