//! Settings-related commands
//!
//! Commands for reading and updating presentation settings. Persistence
//! is best-effort: a failed save is logged and the in-memory settings
//! stay authoritative for the rest of the session.

use crate::app::{self, AppState};
use crate::config;
use crate::error::Result;
use crate::services::{AppSettings, DisplayMode};
use tauri::{AppHandle, Manager, State};

/// Get current application settings
#[tauri::command]
pub async fn get_settings(state: State<'_, AppState>) -> Result<AppSettings> {
    Ok(app::lock_settings(&state)?.clone())
}

/// Update application settings.
///
/// Applies always-on-top to the main window when it changed, then
/// persists. Unknown alarm sounds are rejected; the volume is clamped.
#[tauri::command]
pub async fn update_settings(
    app: AppHandle,
    state: State<'_, AppState>,
    settings: AppSettings,
) -> Result<AppSettings> {
    let settings = settings.sanitize()?;

    let always_on_top_changed = {
        let mut current = app::lock_settings(&state)?;
        let changed = current.always_on_top != settings.always_on_top;
        *current = settings.clone();
        changed
    };

    if always_on_top_changed {
        if let Some(window) = app.get_webview_window(config::MAIN_WINDOW_LABEL) {
            if let Err(e) = window.set_always_on_top(settings.always_on_top) {
                tracing::warn!("Failed to set always-on-top: {}", e);
            } else {
                tracing::info!("Always-on-top set to {}", settings.always_on_top);
            }
        }
    }

    if let Err(e) = state.settings_service.save_settings(&settings).await {
        tracing::warn!("Failed to persist settings: {}", e);
    }

    Ok(settings)
}

/// Set the alarm volume (clamped to [0, 1]) from the volume slider
#[tauri::command]
pub async fn set_alarm_volume(state: State<'_, AppState>, volume: f32) -> Result<f32> {
    let settings = {
        let mut current = app::lock_settings(&state)?;
        current.alarm_volume = volume.clamp(0.0, 1.0);
        current.clone()
    };

    if let Err(e) = state.settings_service.save_settings(&settings).await {
        tracing::warn!("Failed to persist settings: {}", e);
    }

    Ok(settings.alarm_volume)
}

/// Cycle the display density (normal → compact → minimal → normal) and
/// resize the main window to match. Returns the new mode.
#[tauri::command]
pub async fn cycle_display_mode(
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<DisplayMode> {
    let settings = {
        let mut current = app::lock_settings(&state)?;
        current.display_mode = current.display_mode.next();
        current.clone()
    };
    let mode = settings.display_mode;

    if let Some(window) = app.get_webview_window(config::MAIN_WINDOW_LABEL) {
        let (width, height) = mode.window_size();
        if let Err(e) = window.set_size(tauri::LogicalSize::new(width, height)) {
            tracing::warn!("Failed to resize window for display mode: {}", e);
        }
        // The window stays fixed-size in every mode
        if let Err(e) = window.set_resizable(false) {
            tracing::warn!("Failed to lock window size: {}", e);
        }
    }

    if let Err(e) = state.settings_service.save_settings(&settings).await {
        tracing::warn!("Failed to persist settings: {}", e);
    }

    tracing::info!("Display mode is now {:?}", mode);
    Ok(mode)
}
