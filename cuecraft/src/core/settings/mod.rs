//! Settings Persistence System
//!
//! Provides persistent parse/output settings with:
//! - Atomic file writes (temp file + rename)
//! - Schema validation with defaults
//! - Migration support for schema changes
//!
//! Storage location: {config_dir}/cuecraft/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::captions::{ParseOptions, SplitOptions, WrapOptions};
use crate::core::{CoreError, CoreResult};

/// Settings schema version for migration support
pub const SETTINGS_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Lock file name (advisory lock to prevent concurrent writers)
pub const SETTINGS_LOCK_FILE: &str = "settings.json.lock";

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "cuecraft";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Word-wrap settings
    #[serde(default)]
    pub word_wrap: WordWrapSettings,

    /// Cue-split settings
    #[serde(default)]
    pub cue_split: CueSplitSettings,

    /// Output settings
    #[serde(default)]
    pub output: OutputSettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            word_wrap: WordWrapSettings::default(),
            cue_split: CueSplitSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

impl AppSettings {
    /// Normalizes and clamps settings so persisted state is always valid.
    ///
    /// Corrects bad values instead of failing, so a hand-edited file never
    /// blocks a conversion.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        self.word_wrap.max_tokens_per_line = self.word_wrap.max_tokens_per_line.clamp(1, 64);
        self.cue_split.max_lines_per_cue = self.cue_split.max_lines_per_cue.clamp(1, 32);

        self.output.format = normalize_enum(
            &self.output.format,
            &["vtt", "json", "text"],
            default_output_format(),
        );
    }

    /// Builds the options for one parse call
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            wrap: WrapOptions {
                enabled: self.word_wrap.enabled,
                max_tokens_per_line: self.word_wrap.max_tokens_per_line,
            },
            split: SplitOptions {
                enabled: self.cue_split.enabled,
                max_lines_per_cue: self.cue_split.max_lines_per_cue,
            },
        }
    }
}

fn normalize_enum(value: &str, allowed: &[&str], fallback: String) -> String {
    if allowed.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        value.to_ascii_lowercase()
    } else {
        fallback
    }
}

/// Word-wrap settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WordWrapSettings {
    /// Break long transcript lines into several entries
    #[serde(default = "default_false")]
    pub enabled: bool,

    /// Words per transcript entry
    #[serde(default = "default_max_tokens_per_line")]
    pub max_tokens_per_line: usize,
}

impl Default for WordWrapSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_tokens_per_line: default_max_tokens_per_line(),
        }
    }
}

/// Cue-split settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CueSplitSettings {
    /// Split cues with too many transcript lines
    #[serde(default = "default_false")]
    pub enabled: bool,

    /// Transcript lines per cue
    #[serde(default = "default_max_lines_per_cue")]
    pub max_lines_per_cue: usize,
}

impl Default for CueSplitSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_lines_per_cue: default_max_lines_per_cue(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputSettings {
    /// Default inspect format: "vtt", "json" or "text"
    #[serde(default = "default_output_format")]
    pub format: String,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            pretty_json: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_max_tokens_per_line() -> usize {
    WrapOptions::default().max_tokens_per_line
}

fn default_max_lines_per_cue() -> usize {
    SplitOptions::default().max_lines_per_cue
}

fn default_output_format() -> String {
    "text".to_string()
}

/// Platform default settings directory
pub fn default_settings_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Settings manager for loading, saving, and resetting settings
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Create a new settings manager with the given settings directory
    pub fn new(settings_dir: PathBuf) -> Self {
        Self {
            settings_path: settings_dir.join(SETTINGS_FILE),
        }
    }

    fn lock_path(&self) -> PathBuf {
        self.settings_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(SETTINGS_LOCK_FILE)
    }

    fn with_lock<T>(&self, exclusive: bool, op: impl FnOnce() -> CoreResult<T>) -> CoreResult<T> {
        // Ensure parent directory exists so the lock file can be created.
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;

        if exclusive {
            fs2::FileExt::lock_exclusive(&lock_file)?;
        } else {
            fs2::FileExt::lock_shared(&lock_file)?;
        }

        let result = op();

        if let Err(e) = fs2::FileExt::unlock(&lock_file) {
            warn!("Failed to unlock settings lock file: {}", e);
        }

        result
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Reads settings without falling back to defaults
    pub fn try_load(&self) -> CoreResult<AppSettings> {
        self.with_lock(false, || {
            if !self.settings_path.exists() {
                info!("Settings file not found, using defaults");
                return Ok(AppSettings::default());
            }

            let content = fs::read_to_string(&self.settings_path)?;
            let mut settings = serde_json::from_str::<AppSettings>(&content)?;

            // Run migrations if needed
            if settings.version < SETTINGS_VERSION {
                info!(
                    "Migrating settings from version {} to {}",
                    settings.version, SETTINGS_VERSION
                );
                settings = self.migrate(settings);
            }

            settings.normalize();
            Ok(settings)
        })
    }

    /// Load settings from disk, returning defaults if the file is missing or unreadable
    pub fn load(&self) -> AppSettings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                AppSettings::default()
            }
        }
    }

    /// Save settings to disk using atomic write (temp file + rename)
    pub fn save(&self, settings: &AppSettings) -> CoreResult<AppSettings> {
        self.with_lock(true, || {
            // Normalize before persisting.
            let mut normalized = settings.clone();
            normalized.normalize();

            crate::core::fs::atomic_write_json_pretty(&self.settings_path, &normalized)
                .map_err(|e| CoreError::SettingsError(format!("Failed to write settings: {}", e)))?;

            info!("Settings saved to {:?}", self.settings_path);
            Ok(normalized)
        })
    }

    /// Reset settings to defaults and delete the settings file
    pub fn reset(&self) -> CoreResult<AppSettings> {
        self.with_lock(true, || {
            if self.settings_path.exists() {
                fs::remove_file(&self.settings_path)?;
                info!("Settings file deleted");
            }
            Ok(AppSettings::default())
        })
    }

    /// Migrate settings from older version
    fn migrate(&self, mut settings: AppSettings) -> AppSettings {
        settings.version = SETTINGS_VERSION;
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert!(!settings.word_wrap.enabled);
        assert_eq!(settings.word_wrap.max_tokens_per_line, 5);
        assert!(!settings.cue_split.enabled);
        assert_eq!(settings.cue_split.max_lines_per_cue, 2);
        assert_eq!(settings.output.format, "text");
    }

    #[test]
    fn test_parse_options_from_settings() {
        let mut settings = AppSettings::default();
        settings.word_wrap.enabled = true;
        settings.word_wrap.max_tokens_per_line = 7;
        settings.cue_split.enabled = true;
        settings.cue_split.max_lines_per_cue = 3;

        let options = settings.parse_options();
        assert_eq!(options.wrap, WrapOptions::words(7));
        assert_eq!(options.split, SplitOptions::lines(3));
    }

    #[test]
    fn test_normalization_clamps_to_range() {
        let mut settings = AppSettings::default();
        settings.version = 0;
        settings.word_wrap.max_tokens_per_line = 0;
        settings.cue_split.max_lines_per_cue = 1_000;
        settings.output.format = "JSON".to_string();

        settings.normalize();

        assert_eq!(settings.version, SETTINGS_VERSION);
        assert_eq!(settings.word_wrap.max_tokens_per_line, 1);
        assert_eq!(settings.cue_split.max_lines_per_cue, 32);
        assert_eq!(settings.output.format, "json");
    }

    #[test]
    fn test_normalization_resets_unknown_format() {
        let mut settings = AppSettings::default();
        settings.output.format = "srt".to_string();
        settings.normalize();
        assert_eq!(settings.output.format, "text");
    }

    #[test]
    fn test_settings_persist_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path().to_path_buf());

        let mut settings = AppSettings::default();
        settings.cue_split.enabled = true;
        settings.cue_split.max_lines_per_cue = 4;
        settings.output.pretty_json = false;

        manager.save(&settings).unwrap();
        let loaded = manager.load();

        assert!(loaded.cue_split.enabled);
        assert_eq!(loaded.cue_split.max_lines_per_cue, 4);
        assert!(!loaded.output.pretty_json);
    }

    #[test]
    fn test_save_returns_normalized() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path().to_path_buf());

        let mut settings = AppSettings::default();
        settings.word_wrap.max_tokens_per_line = 0;

        let saved = manager.save(&settings).unwrap();
        assert_eq!(saved.word_wrap.max_tokens_per_line, 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(
            &settings_path,
            r#"{
                "version": 1,
                "wordWrap": { "enabled": true }
            }"#,
        )
        .unwrap();

        let manager = SettingsManager::new(temp_dir.path().to_path_buf());
        let settings = manager.load();

        assert!(settings.word_wrap.enabled);
        assert_eq!(settings.word_wrap.max_tokens_per_line, 5);
        assert_eq!(settings.cue_split, CueSplitSettings::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path().to_path_buf());
        assert_eq!(manager.load(), AppSettings::default());
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE), "{ not json").unwrap();

        let manager = SettingsManager::new(temp_dir.path().to_path_buf());
        assert!(matches!(manager.try_load(), Err(CoreError::JsonError(_))));
        assert_eq!(manager.load(), AppSettings::default());
    }

    #[test]
    fn test_reset_deletes_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path().to_path_buf());

        manager.save(&AppSettings::default()).unwrap();
        assert!(manager.settings_path().exists());

        let reset = manager.reset().unwrap();
        assert_eq!(reset, AppSettings::default());
        assert!(!manager.settings_path().exists());
    }

    #[test]
    fn test_old_version_is_migrated() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE), r#"{"version": 0}"#).unwrap();

        let manager = SettingsManager::new(temp_dir.path().to_path_buf());
        assert_eq!(manager.load().version, SETTINGS_VERSION);
    }
}
