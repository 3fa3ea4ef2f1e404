//! Application state and initialization
//!
//! The single `AppState` owns the timer core, the in-memory settings and
//! the services; it is created once during setup and handed to Tauri's
//! state manager. Nothing in the application reaches for a global.

use crate::config;
use crate::core::TimerCore;
use crate::error::{AppError, Result};
use crate::services::{AlarmPlayer, AppSettings, SettingsService, WindowStateService};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tauri::{App, Manager};

/// Central application state
pub struct AppState {
    /// The countdown state machine. Short critical sections only; every
    /// tick and command locks, mutates and releases before anything else
    /// runs, which keeps ticks strictly serialized.
    pub timer: Mutex<TimerCore>,
    /// In-memory settings, persisted through the settings service
    pub settings: Mutex<AppSettings>,
    pub settings_service: SettingsService,
    pub window_state_service: WindowStateService,
    pub alarm: AlarmPlayer,
    /// Handle of the running tick task, if any. Aborted on pause/reset;
    /// the task also exits by itself after expiry.
    pub ticker: Mutex<Option<tauri::async_runtime::JoinHandle<()>>>,
    pub sounds_dir: PathBuf,
    pub app_data_dir: PathBuf,
}

/// Lock the timer core, surfacing poisoning as an application error
pub fn lock_timer(state: &AppState) -> Result<MutexGuard<'_, TimerCore>> {
    state
        .timer
        .lock()
        .map_err(|e| AppError::Generic(format!("Timer lock poisoned: {}", e)))
}

/// Lock the cached settings
pub fn lock_settings(state: &AppState) -> Result<MutexGuard<'_, AppSettings>> {
    state
        .settings
        .lock()
        .map_err(|e| AppError::Generic(format!("Settings lock poisoned: {}", e)))
}

/// Application setup - called once on startup
pub fn setup(app: &mut App) -> Result<()> {
    tracing::info!("Initializing application");

    let app_data_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| AppError::Generic(format!("Failed to get app data dir: {}", e)))?;

    tracing::info!("App data directory: {:?}", app_data_dir);
    std::fs::create_dir_all(&app_data_dir)?;

    // Bundled alarm sounds live next to the other app resources
    let sounds_dir = app
        .path()
        .resource_dir()
        .map(|dir| dir.join("sounds"))
        .unwrap_or_else(|_| app_data_dir.join("sounds"));

    let settings_service = SettingsService::new(app_data_dir.clone());
    let window_state_service = WindowStateService::new(app_data_dir.clone());

    // Load persisted settings and the saved timer duration before the
    // first render
    let settings = tauri::async_runtime::block_on(settings_service.load_settings());
    let timer_doc = tauri::async_runtime::block_on(settings_service.load_timer());

    let mut timer = TimerCore::new();
    timer.restore(timer_doc);

    let state = AppState {
        timer: Mutex::new(timer),
        settings: Mutex::new(settings.clone()),
        settings_service,
        window_state_service: window_state_service.clone(),
        alarm: AlarmPlayer::spawn(),
        ticker: Mutex::new(None),
        sounds_dir,
        app_data_dir,
    };
    app.manage(state);

    // Apply presentation settings to the main window
    if let Some(window) = app.get_webview_window(config::MAIN_WINDOW_LABEL) {
        if settings.always_on_top {
            if let Err(e) = window.set_always_on_top(true) {
                tracing::warn!("Failed to apply always-on-top: {}", e);
            }
        }

        let (width, height) = settings.display_mode.window_size();
        if let Err(e) = window.set_size(tauri::LogicalSize::new(width, height)) {
            tracing::warn!("Failed to apply display mode size: {}", e);
        }

        // Restore the saved window position, best-effort
        let saved = tauri::async_runtime::block_on(window_state_service.load());
        if let (Some(x), Some(y)) = (saved.x, saved.y) {
            if let Err(e) = window.set_position(tauri::PhysicalPosition::new(x, y)) {
                tracing::warn!("Failed to restore window position: {}", e);
            }
        }
    }

    tracing::info!("Application initialized successfully");
    Ok(())
}
