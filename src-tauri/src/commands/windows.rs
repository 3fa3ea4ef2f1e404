//! Window management commands
//!
//! Plumbing around the host windowing runtime: the secondary "time's
//! up" window, drag-to-move for the frameless main window, position
//! persistence, devtools and app exit.

use crate::app::{self, AppState};
use crate::config;
use crate::error::Result;
use crate::services::WindowState;
use tauri::{AppHandle, Manager, State, WebviewUrl, WebviewWindowBuilder};

/// Show the "time's up" window, creating it on first use.
/// Follows the create-or-focus pattern: an existing window is shown and
/// focused instead of rebuilt.
#[tauri::command]
pub async fn show_timeup_window(app: AppHandle) -> Result<()> {
    if let Some(window) = app.get_webview_window(config::TIMEUP_WINDOW_LABEL) {
        tracing::debug!("Time's up window already exists, showing");
        let _ = window.unminimize();
        let _ = window.show();
        let _ = window.set_focus();
        return Ok(());
    }

    tracing::debug!("Creating time's up window");
    let (width, height) = config::TIMEUP_WINDOW_SIZE;
    let window = WebviewWindowBuilder::new(
        &app,
        config::TIMEUP_WINDOW_LABEL,
        WebviewUrl::App("timeup.html".into()),
    )
    .title("Time's Up!")
    .inner_size(width, height)
    .resizable(false)
    .always_on_top(true)
    .center()
    .build()?;

    let _ = window.show();
    let _ = window.set_focus();
    tracing::info!("Time's up window shown");
    Ok(())
}

/// Hide the "time's up" window if it exists
#[tauri::command]
pub async fn hide_timeup_window(app: AppHandle) -> Result<()> {
    if let Some(window) = app.get_webview_window(config::TIMEUP_WINDOW_LABEL) {
        let _ = window.hide();
        tracing::debug!("Time's up window hidden");
    }
    Ok(())
}

/// Cross-window dismissal: the time's up window sent its sentinel
/// close action. Stops the alarm, clears the presentation state AND the
/// once-per-expiry window guard, then hides the window.
#[tauri::command]
pub async fn close_timeup_window(app: AppHandle, state: State<'_, AppState>) -> Result<()> {
    state.alarm.stop();
    let snapshot = {
        let mut timer = app::lock_timer(&state)?;
        timer.dismiss_from_timeup_window();
        timer.snapshot()
    };
    super::timer::emit_state(&app, &snapshot);

    hide_timeup_window(app).await
}

/// Begin a native drag of the main window (frameless chrome)
#[tauri::command]
pub async fn start_drag(window: tauri::Window) -> Result<()> {
    window.start_dragging()?;
    Ok(())
}

/// Save the main window position, called when a drag ends.
/// Best-effort: failures are logged and ignored.
#[tauri::command]
pub async fn save_window_position(app: AppHandle, state: State<'_, AppState>) -> Result<()> {
    let Some(window) = app.get_webview_window(config::MAIN_WINDOW_LABEL) else {
        return Ok(());
    };

    let position = window.outer_position()?;
    let size = window.inner_size()?;
    let window_state = WindowState {
        x: Some(position.x),
        y: Some(position.y),
        width: Some(size.width),
        height: Some(size.height),
    };

    if let Err(e) = state.window_state_service.save(&window_state).await {
        tracing::warn!("Failed to save window position: {}", e);
    }
    Ok(())
}

/// Open devtools on the main window (F12)
#[tauri::command]
pub async fn open_devtools(app: AppHandle) -> Result<()> {
    if let Some(window) = app.get_webview_window(config::MAIN_WINDOW_LABEL) {
        window.open_devtools();
    }
    Ok(())
}

/// Save the timer document and exit the application
#[tauri::command]
pub async fn exit_app(app: AppHandle, state: State<'_, AppState>) -> Result<()> {
    tracing::info!("Exit requested, saving timer state");

    let doc = app::lock_timer(&state)?.document();
    if let Err(e) = state.settings_service.save_timer(&doc).await {
        tracing::warn!("Failed to save timer state on exit: {}", e);
    }

    app.exit(0);
    Ok(())
}
