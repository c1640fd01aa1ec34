use crate::defaults;
use crate::error::{ListenError, Result};
use crate::permission::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub ui: UiConfig,
}

/// Voice session configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Locale handed to the recognition engine verbatim.
    pub locale: String,
    /// Platform whose permission naming is used for the microphone capability.
    pub platform: Platform,
}

/// Terminal front end configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            locale: defaults::DEFAULT_LOCALE.to_string(),
            platform: Platform::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is unreadable or contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Only a missing file falls back to defaults; invalid TOML is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(ListenError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - LISTENKIT_LOCALE → session.locale
    /// - LISTENKIT_PLATFORM → session.platform
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(locale) = std::env::var(defaults::LOCALE_ENV)
            && !locale.is_empty()
        {
            self.session.locale = locale;
        }

        if let Ok(platform) = std::env::var(defaults::PLATFORM_ENV)
            && !platform.is_empty()
        {
            match platform.parse() {
                Ok(platform) => self.session.platform = platform,
                Err(e) => log::warn!("Ignoring {}: {}", defaults::PLATFORM_ENV, e),
            }
        }

        self
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        validate_locale(&self.session.locale)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ListenError::Other(e.to_string()))
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/listenkit/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("listenkit")
            .join("config.toml")
    }
}

/// Accepts `xx`, `xxx`, `xx-YY` and `xx_YY` shaped tags.
fn validate_locale(locale: &str) -> Result<()> {
    let invalid = |message: &str| ListenError::ConfigInvalidValue {
        key: "session.locale".to_string(),
        message: format!("{message} (got {locale:?})"),
    };

    if locale.is_empty() {
        return Err(invalid("must not be empty"));
    }

    let mut parts = locale.split(['-', '_']);
    let language = parts.next().unwrap_or_default();
    if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid("language must be 2-3 letters"));
    }
    for part in parts {
        if part.is_empty() || part.len() > 8 || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("malformed region or subtag"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_listenkit_env() {
        remove_env(defaults::LOCALE_ENV);
        remove_env(defaults::PLATFORM_ENV);
    }

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.session.locale, "fr-FR");
        assert_eq!(config.session.platform, Platform::Android);
        assert!(config.ui.color);
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_file = write_temp(
            r#"
            [session]
            locale = "en-US"
            platform = "ios"

            [ui]
            color = false
        "#,
        );

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.session.locale, "en-US");
        assert_eq!(config.session.platform, Platform::Ios);
        assert!(!config.ui.color);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let temp_file = write_temp(
            r#"
            [session]
            locale = "de-DE"
        "#,
        );

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.session.locale, "de-DE");
        assert_eq!(config.session.platform, Platform::Android);
        assert!(config.ui.color);
    }

    #[test]
    fn test_env_override_locale() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_listenkit_env();

        set_env(defaults::LOCALE_ENV, "es-ES");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.session.locale, "es-ES");
        assert_eq!(config.session.platform, Platform::Android);

        clear_listenkit_env();
    }

    #[test]
    fn test_env_override_platform() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_listenkit_env();

        set_env(defaults::PLATFORM_ENV, "ios");
        let config = Config::default().with_env_overrides();
        assert_eq!(config.session.platform, Platform::Ios);

        clear_listenkit_env();
    }

    #[test]
    fn test_env_override_unknown_platform_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_listenkit_env();

        set_env(defaults::PLATFORM_ENV, "symbian");
        let config = Config::default().with_env_overrides();
        assert_eq!(config.session.platform, Platform::Android);

        clear_listenkit_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_listenkit_env();

        set_env(defaults::LOCALE_ENV, "");
        let config = Config::default().with_env_overrides();
        assert_eq!(config.session.locale, "fr-FR");

        clear_listenkit_env();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let temp_file = write_temp(
            r#"
            [session
            locale = "broken
        "#,
        );

        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_rejects_invalid_toml() {
        let temp_file = write_temp("[session\nlocale = ");
        let result = Config::load_or_default(temp_file.path());
        assert!(matches!(result, Err(ListenError::Config(_))));
    }

    #[test]
    fn test_default_path_ends_with_listenkit_config() {
        let path = Config::default_path();
        assert!(path.ends_with("listenkit/config.toml"));
    }

    #[test]
    fn test_validate_accepts_common_locales() {
        for locale in ["fr", "fr-FR", "en_US", "zh-Hant-TW", "yue"] {
            let mut config = Config::default();
            config.session.locale = locale.to_string();
            assert!(config.validate().is_ok(), "{locale} should be valid");
        }
    }

    #[test]
    fn test_validate_rejects_bad_locales() {
        for locale in ["", "f", "french-FR", "fr-", "fr--FR", "12-FR"] {
            let mut config = Config::default();
            config.session.locale = locale.to_string();
            assert!(
                matches!(
                    config.validate(),
                    Err(ListenError::ConfigInvalidValue { .. })
                ),
                "{locale:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_to_toml_roundtrips_through_load() {
        let mut config = Config::default();
        config.session.locale = "it-IT".to_string();
        let rendered = config.to_toml().unwrap();

        let temp_file = write_temp(&rendered);
        assert_eq!(Config::load(temp_file.path()).unwrap(), config);
    }
}
