use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use gpui::*;
use gpui_component::{Theme, ThemeMode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use parlor_gateway::{DEFAULT_BASE_URL, resolve_messages_endpoint};

pub const SETTINGS_DIRECTORY_NAME: &str = "parlor";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
/// Environment fallback for the gateway base address.
pub const GATEWAY_URL_ENV: &str = "PARLOR_GATEWAY_URL";

/// Startup configuration for the showcase app.
///
/// Loaded once and passed by value; the base address is only ever an input to
/// gateway construction and request-log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseSettings {
    #[serde(default)]
    pub gateway_base_url: Option<String>,
    #[serde(
        default = "default_theme_mode",
        serialize_with = "serialize_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
}

impl Default for ShowcaseSettings {
    fn default() -> Self {
        Self {
            gateway_base_url: None,
            theme_mode: default_theme_mode(),
        }
    }
}

impl ShowcaseSettings {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".parlor"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::default_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
            return Self::default();
        }

        let figment =
            Figment::from(Serialized::defaults(Self::default())).merge(Json::file(path));

        match figment.extract::<Self>() {
            Ok(settings) => settings.normalized(),
            Err(error) => {
                tracing::warn!(
                    "failed to parse settings from {:?}: {}. using defaults",
                    path,
                    error
                );
                Self::default()
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.gateway_base_url = self
            .gateway_base_url
            .map(|base| base.trim().to_string())
            .filter(|base| !base.is_empty());
        self
    }

    /// The configured base address wins; then the environment; then the fixed
    /// local default.
    pub fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.gateway_base_url {
            return base.clone();
        }

        std::env::var(GATEWAY_URL_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn messages_endpoint(&self) -> String {
        resolve_messages_endpoint(Some(&self.resolved_base_url()))
    }

    pub fn apply_theme(&self, window: Option<&mut Window>, cx: &mut App) {
        Theme::change(self.theme_mode, window, cx);
    }
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::Light
}

fn serialize_theme_mode<S>(value: &ThemeMode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.name())
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> Result<ThemeMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(parse_theme_mode(&value))
}

fn parse_theme_mode(value: &str) -> ThemeMode {
    if value.trim().eq_ignore_ascii_case("dark") {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_discards_blank_base_urls() {
        let settings = ShowcaseSettings {
            gateway_base_url: Some("   ".to_string()),
            theme_mode: ThemeMode::Light,
        }
        .normalized();

        assert_eq!(settings.gateway_base_url, None);
    }

    #[test]
    fn configured_base_url_wins_over_default() {
        let settings = ShowcaseSettings {
            gateway_base_url: Some("https://widget.example.com/api/v1".to_string()),
            theme_mode: ThemeMode::Light,
        };

        assert_eq!(
            settings.messages_endpoint(),
            "https://widget.example.com/api/v1/messages"
        );
    }

    #[test]
    fn theme_mode_parses_case_insensitively() {
        assert_eq!(parse_theme_mode("DARK"), ThemeMode::Dark);
        assert_eq!(parse_theme_mode("light"), ThemeMode::Light);
        assert_eq!(parse_theme_mode("unknown"), ThemeMode::Light);
    }
}
