//! Timer commands and the tick source
//!
//! Commands lock the core, apply one operation, persist what needs
//! persisting and emit the fresh snapshot. The tick source is a tokio
//! task spawned on start and aborted on pause/reset; it exits by itself
//! after expiry, so a stale callback can never mutate a stopped timer.

use crate::app::{self, AppState};
use crate::config;
use crate::core::{ExpiryBehavior, TickOutcome, TimerSnapshot};
use crate::error::Result;
use crate::services::audio;
use std::time::Duration;
use tauri::{AppHandle, Emitter, Manager, State};

/// Event carrying the timer snapshot after every state change
pub const TIMER_STATE_EVENT: &str = "timer-state-changed";

/// Event emitted once per expiry, after the snapshot event
pub const TIMER_EXPIRED_EVENT: &str = "timer-expired";

/// Emit the current snapshot to all windows
pub fn emit_state(app: &AppHandle, snapshot: &TimerSnapshot) {
    if let Err(e) = app.emit(TIMER_STATE_EVENT, snapshot) {
        tracing::warn!("Failed to emit timer state: {}", e);
    }
}

/// Persist the timer document in the background; failures are logged
/// and the state machine proceeds unaffected.
fn persist_timer_doc(state: &AppState) {
    let service = state.settings_service.clone();
    let doc = match app::lock_timer(state) {
        Ok(timer) => timer.document(),
        Err(e) => {
            tracing::error!("Cannot snapshot timer for persistence: {}", e);
            return;
        }
    };
    tauri::async_runtime::spawn(async move {
        if let Err(e) = service.save_timer(&doc).await {
            tracing::warn!("Failed to persist timer state: {}", e);
        }
    });
}

/// Get the current timer snapshot
#[tauri::command]
pub async fn get_timer_state(state: State<'_, AppState>) -> Result<TimerSnapshot> {
    Ok(app::lock_timer(&state)?.snapshot())
}

/// Set minutes from the increment/decrement controls (clamped to 0-99)
#[tauri::command]
pub async fn set_minutes(
    app: AppHandle,
    state: State<'_, AppState>,
    minutes: u16,
) -> Result<TimerSnapshot> {
    let snapshot = {
        let mut timer = app::lock_timer(&state)?;
        timer.set_minutes(minutes);
        timer.snapshot()
    };
    emit_state(&app, &snapshot);
    Ok(snapshot)
}

/// Set seconds from the increment/decrement controls (clamped to 0-59)
#[tauri::command]
pub async fn set_seconds(
    app: AppHandle,
    state: State<'_, AppState>,
    seconds: u16,
) -> Result<TimerSnapshot> {
    let snapshot = {
        let mut timer = app::lock_timer(&state)?;
        timer.set_seconds(seconds);
        timer.snapshot()
    };
    emit_state(&app, &snapshot);
    Ok(snapshot)
}

/// Feed one decimal digit through the shift-register time entry.
///
/// Swallowed while running. A shift-register invariant violation is a
/// defect: it is logged and the input dropped, never surfaced to the
/// user.
#[tauri::command]
pub async fn enter_digit(
    app: AppHandle,
    state: State<'_, AppState>,
    digit: u8,
) -> Result<TimerSnapshot> {
    let (entered, snapshot) = {
        let mut timer = app::lock_timer(&state)?;
        let entered = match timer.enter_digit(digit) {
            Ok(entered) => entered,
            Err(e) => {
                tracing::error!("Digit entry dropped: {}", e);
                None
            }
        };
        (entered, timer.snapshot())
    };

    if let Some(entered) = entered {
        tracing::debug!(
            "Digit {} entered: {:02}:{:02}",
            digit,
            entered.minutes,
            entered.seconds
        );
        // Saved immediately after every digit-entry set, per the store
        // contract
        persist_timer_doc(&state);
        emit_state(&app, &snapshot);
    }

    Ok(snapshot)
}

/// Start the countdown. No-op at 00:00.
#[tauri::command]
pub async fn start_timer(app: AppHandle, state: State<'_, AppState>) -> Result<TimerSnapshot> {
    let (started, snapshot) = {
        let mut timer = app::lock_timer(&state)?;
        (timer.start(), timer.snapshot())
    };

    if started {
        // Starting dismisses any alarm still sounding from a previous
        // expiry
        state.alarm.stop();

        let mut ticker = state
            .ticker
            .lock()
            .map_err(|e| crate::error::AppError::Generic(format!("Ticker lock poisoned: {}", e)))?;
        if let Some(handle) = ticker.take() {
            handle.abort();
        }
        *ticker = Some(spawn_ticker(app.clone()));
        tracing::info!(
            "Timer started: {:02}:{:02}",
            snapshot.minutes,
            snapshot.seconds
        );
    }

    emit_state(&app, &snapshot);
    Ok(snapshot)
}

/// Pause the running countdown
#[tauri::command]
pub async fn pause_timer(app: AppHandle, state: State<'_, AppState>) -> Result<TimerSnapshot> {
    let snapshot = {
        let mut timer = app::lock_timer(&state)?;
        timer.pause();
        timer.snapshot()
    };

    stop_ticker(&state);
    tracing::info!(
        "Timer paused at {:02}:{:02}",
        snapshot.minutes,
        snapshot.seconds
    );
    emit_state(&app, &snapshot);
    Ok(snapshot)
}

/// Reset the countdown to idle, forgetting the remembered duration
#[tauri::command]
pub async fn reset_timer(app: AppHandle, state: State<'_, AppState>) -> Result<TimerSnapshot> {
    let snapshot = {
        let mut timer = app::lock_timer(&state)?;
        timer.dismiss_alarm();
        timer.reset();
        timer.snapshot()
    };

    stop_ticker(&state);
    state.alarm.stop();
    tracing::info!("Timer reset");
    emit_state(&app, &snapshot);
    Ok(snapshot)
}

/// Acknowledge an expired alarm from any user interaction: stop the
/// sound and clear the time's-up visual. Idempotent.
#[tauri::command]
pub async fn dismiss_alarm(app: AppHandle, state: State<'_, AppState>) -> Result<TimerSnapshot> {
    state.alarm.stop();
    let snapshot = {
        let mut timer = app::lock_timer(&state)?;
        timer.dismiss_alarm();
        timer.snapshot()
    };
    emit_state(&app, &snapshot);
    Ok(snapshot)
}

/// Abort the tick task, if one is running
pub fn stop_ticker(state: &AppState) {
    match state.ticker.lock() {
        Ok(mut ticker) => {
            if let Some(handle) = ticker.take() {
                handle.abort();
            }
        }
        Err(e) => tracing::error!("Ticker lock poisoned: {}", e),
    }
}

/// Spawn the 1-second tick loop. The loop runs while the timer is
/// running and exits on expiry; each iteration completes its whole
/// state update before the next can fire.
fn spawn_ticker(app: AppHandle) -> tauri::async_runtime::JoinHandle<()> {
    tauri::async_runtime::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(config::TICK_INTERVAL_MS));
        // The first interval tick completes immediately; consume it so
        // the countdown starts a full second after start()
        interval.tick().await;
        loop {
            interval.tick().await;
            if !run_tick(&app) {
                break;
            }
        }
    })
}

/// One tick: advance the core and act on the outcome. Returns whether
/// the loop should keep going.
fn run_tick(app: &AppHandle) -> bool {
    let state = app.state::<AppState>();

    // Expiry inputs are read here, each tick, and passed explicitly;
    // the core never sees the settings store
    let (show_timeup_window, alarm_sound, alarm_volume) = match app::lock_settings(&state) {
        Ok(settings) => (
            settings.show_timeup_window,
            settings.alarm_sound.clone(),
            settings.alarm_volume,
        ),
        Err(e) => {
            tracing::error!("Tick aborted: {}", e);
            return false;
        }
    };

    let (outcome, snapshot) = match app::lock_timer(&state) {
        Ok(mut timer) => {
            let outcome = timer.tick(ExpiryBehavior { show_timeup_window });
            (outcome, timer.snapshot())
        }
        Err(e) => {
            tracing::error!("Tick aborted: {}", e);
            return false;
        }
    };

    match outcome {
        TickOutcome::Idle => false,
        TickOutcome::Running => {
            emit_state(app, &snapshot);
            true
        }
        TickOutcome::Expired {
            start_alarm,
            show_timeup_window,
        } => {
            tracing::info!("Countdown expired");

            if start_alarm {
                let played = audio::resolve_sound_path(&state.sounds_dir, &alarm_sound)
                    .and_then(|path| state.alarm.play(path, alarm_volume));
                if let Err(e) = played {
                    tracing::warn!("Alarm playback failed: {}", e);
                    // Clear the guard so the next expiry can retry
                    if let Ok(mut timer) = app::lock_timer(&state) {
                        timer.alarm_failed();
                    }
                }
            }

            if show_timeup_window {
                // Audio start takes priority; the window follows after a
                // short fixed delay
                let app = app.clone();
                tauri::async_runtime::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(config::TIMEUP_WINDOW_DELAY_MS)).await;
                    if let Err(e) = super::windows::show_timeup_window(app).await {
                        tracing::warn!("Failed to show time's up window: {}", e);
                    }
                });
            }

            emit_state(app, &snapshot);
            if let Err(e) = app.emit(TIMER_EXPIRED_EVENT, ()) {
                tracing::warn!("Failed to emit expiry event: {}", e);
            }
            false
        }
    }
}
