//! Settings service
//!
//! Manages application settings and the persisted timer document using
//! JSON file storage. Both live in one `settings.json` document under
//! separate keys, so a single read serves both at startup.
//!
//! Persistence is best-effort: a missing, partial or corrupt file
//! degrades to defaults with a warning. The timer keeps working whatever
//! happens here.

use crate::config;
use crate::core::TimerDocument;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Main-window display density
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Normal,
    Compact,
    Minimal,
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::Normal
    }
}

impl DisplayMode {
    /// Cycle to the next mode; total over all variants
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Normal => DisplayMode::Compact,
            DisplayMode::Compact => DisplayMode::Minimal,
            DisplayMode::Minimal => DisplayMode::Normal,
        }
    }

    /// Main-window size for this mode, in logical pixels
    pub fn window_size(self) -> (f64, f64) {
        match self {
            DisplayMode::Normal => config::NORMAL_WINDOW_SIZE,
            DisplayMode::Compact => config::COMPACT_WINDOW_SIZE,
            DisplayMode::Minimal => config::MINIMAL_WINDOW_SIZE,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub always_on_top: bool,
    pub dark_mode: bool,
    pub alarm_sound: String,
    pub alarm_volume: f32,
    pub display_mode: DisplayMode,
    pub show_timeup_window: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            always_on_top: false,
            dark_mode: false,
            alarm_sound: config::DEFAULT_ALARM_SOUND.to_string(),
            alarm_volume: config::DEFAULT_ALARM_VOLUME,
            display_mode: DisplayMode::Normal,
            show_timeup_window: true,
        }
    }
}

impl AppSettings {
    /// Clamp and validate fields coming from the frontend.
    /// An unknown alarm sound is an error; volume is clamped silently.
    pub fn sanitize(mut self) -> Result<Self> {
        if !config::VALID_ALARM_SOUNDS.contains(&self.alarm_sound.as_str()) {
            return Err(AppError::Generic(format!(
                "Unknown alarm sound: {}",
                self.alarm_sound
            )));
        }
        self.alarm_volume = self.alarm_volume.clamp(0.0, 1.0);
        Ok(self)
    }
}

/// On-disk document: settings plus the persisted timer duration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct StoreDocument {
    settings: AppSettings,
    timer: TimerDocument,
}

/// Service for persisting settings and the timer document
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
    // Every save is a read-modify-write of the whole document; clones
    // share this lock so a background timer save and a settings update
    // cannot interleave and drop a section.
    write_lock: Arc<Mutex<()>>,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join("settings.json"),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load_document(&self) -> StoreDocument {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return StoreDocument::default();
        }

        let content = match fs::read_to_string(&self.settings_path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read settings file, using defaults: {}", e);
                return StoreDocument::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                StoreDocument::default()
            }
        }
    }

    async fn save_document(&self, document: &StoreDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(document)?;
        fs::write(&self.settings_path, content).await?;
        tracing::debug!("Settings saved to {:?}", self.settings_path);
        Ok(())
    }

    /// Load application settings, falling back to defaults on any failure
    pub async fn load_settings(&self) -> AppSettings {
        self.load_document().await.settings
    }

    /// Save application settings, preserving the timer section
    pub async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_document().await;
        document.settings = settings.clone();
        self.save_document(&document).await
    }

    /// Load the persisted timer document (duration + remembered time)
    pub async fn load_timer(&self) -> TimerDocument {
        self.load_document().await.timer
    }

    /// Save the timer document, preserving the settings section
    pub async fn save_timer(&self, timer: &TimerDocument) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_document().await;
        document.timer = timer.clone();
        self.save_document(&document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SetTime;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_defaults_when_file_missing() {
        let (service, _temp) = create_test_service();

        let settings = service.load_settings().await;
        assert!(!settings.always_on_top);
        assert!(!settings.dark_mode);
        assert_eq!(settings.alarm_sound, "alarm.mp3");
        assert_eq!(settings.alarm_volume, 0.8);
        assert_eq!(settings.display_mode, DisplayMode::Normal);
        assert!(settings.show_timeup_window);

        let timer = service.load_timer().await;
        assert_eq!(timer.minutes, 0);
        assert_eq!(timer.seconds, 0);
        assert!(timer.last_set_time.is_none());
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let (service, _temp) = create_test_service();

        let updated = AppSettings {
            always_on_top: true,
            dark_mode: true,
            alarm_sound: "gong.mp3".to_string(),
            alarm_volume: 0.5,
            display_mode: DisplayMode::Compact,
            show_timeup_window: false,
        };
        service.save_settings(&updated).await.unwrap();

        let loaded = service.load_settings().await;
        assert!(loaded.always_on_top);
        assert!(loaded.dark_mode);
        assert_eq!(loaded.alarm_sound, "gong.mp3");
        assert_eq!(loaded.alarm_volume, 0.5);
        assert_eq!(loaded.display_mode, DisplayMode::Compact);
        assert!(!loaded.show_timeup_window);
    }

    #[tokio::test]
    async fn test_timer_section_preserved_across_settings_update() {
        let (service, _temp) = create_test_service();

        let timer = TimerDocument {
            minutes: 5,
            seconds: 30,
            last_set_time: Some(SetTime {
                minutes: 5,
                seconds: 30,
            }),
        };
        service.save_timer(&timer).await.unwrap();

        let settings = AppSettings {
            dark_mode: true,
            ..AppSettings::default()
        };
        service.save_settings(&settings).await.unwrap();

        let loaded = service.load_timer().await;
        assert_eq!(loaded.minutes, 5);
        assert_eq!(loaded.seconds, 30);
        assert_eq!(
            loaded.last_set_time,
            Some(SetTime {
                minutes: 5,
                seconds: 30,
            })
        );
    }

    #[tokio::test]
    async fn test_interleaved_saves_keep_both_sections() {
        let (service, _temp) = create_test_service();

        // Concurrent settings and timer saves, the way a background
        // timer persist can overlap a settings update. Each clone shares
        // the service write lock, so neither section may be lost.
        let mut tasks = Vec::new();
        for seconds in 0..10u16 {
            let svc = service.clone();
            tasks.push(tokio::spawn(async move {
                let settings = AppSettings {
                    dark_mode: true,
                    ..AppSettings::default()
                };
                svc.save_settings(&settings).await.unwrap();
            }));

            let svc = service.clone();
            tasks.push(tokio::spawn(async move {
                let timer = TimerDocument {
                    minutes: 7,
                    seconds,
                    last_set_time: None,
                };
                svc.save_timer(&timer).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert!(service.load_settings().await.dark_mode);
        assert_eq!(service.load_timer().await.minutes, 7);
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        tokio::fs::write(&path, "{not valid json").await.unwrap();

        let service = SettingsService::new(temp_dir.path().to_path_buf());
        let settings = service.load_settings().await;
        assert_eq!(settings.alarm_sound, "alarm.mp3");

        let timer = service.load_timer().await;
        assert_eq!(timer.minutes, 0);
    }

    #[tokio::test]
    async fn test_partial_file_fills_missing_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        tokio::fs::write(&path, r#"{"settings":{"darkMode":true}}"#)
            .await
            .unwrap();

        let service = SettingsService::new(temp_dir.path().to_path_buf());
        let settings = service.load_settings().await;
        assert!(settings.dark_mode);
        assert_eq!(settings.alarm_sound, "alarm.mp3");
        assert_eq!(settings.alarm_volume, 0.8);
    }

    #[test]
    fn test_sanitize_clamps_volume() {
        let settings = AppSettings {
            alarm_volume: 1.7,
            ..AppSettings::default()
        };
        assert_eq!(settings.sanitize().unwrap().alarm_volume, 1.0);

        let settings = AppSettings {
            alarm_volume: -0.2,
            ..AppSettings::default()
        };
        assert_eq!(settings.sanitize().unwrap().alarm_volume, 0.0);
    }

    #[test]
    fn test_sanitize_rejects_unknown_sound() {
        let settings = AppSettings {
            alarm_sound: "../../etc/passwd".to_string(),
            ..AppSettings::default()
        };
        assert!(settings.sanitize().is_err());
    }

    #[test]
    fn test_display_mode_cycle_is_total() {
        assert_eq!(DisplayMode::Normal.next(), DisplayMode::Compact);
        assert_eq!(DisplayMode::Compact.next(), DisplayMode::Minimal);
        assert_eq!(DisplayMode::Minimal.next(), DisplayMode::Normal);
    }
}
