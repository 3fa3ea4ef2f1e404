// Lightning Timer - lightweight desktop countdown timer
// Entry point and application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod commands;
mod config;
mod core;
mod error;
mod services;

use tauri::{Manager, WindowEvent};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lightning_timer=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lightning Timer");

    tauri::Builder::default()
        .setup(|app| {
            tracing::info!("Running app setup");
            app::setup(app)?;
            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::CloseRequested { .. } = event {
                // Closing the main window ends the application; the
                // timer document is saved first, best-effort
                if window.label() == config::MAIN_WINDOW_LABEL {
                    let state = window.state::<app::AppState>();
                    if let Ok(timer) = app::lock_timer(&state) {
                        let doc = timer.document();
                        let service = state.settings_service.clone();
                        drop(timer);
                        if let Err(e) =
                            tauri::async_runtime::block_on(service.save_timer(&doc))
                        {
                            tracing::warn!("Failed to save timer state on close: {}", e);
                        }
                    }
                    window.app_handle().exit(0);
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_app_info,
            commands::get_timer_state,
            commands::set_minutes,
            commands::set_seconds,
            commands::enter_digit,
            commands::start_timer,
            commands::pause_timer,
            commands::reset_timer,
            commands::dismiss_alarm,
            commands::get_settings,
            commands::update_settings,
            commands::set_alarm_volume,
            commands::cycle_display_mode,
            commands::show_timeup_window,
            commands::hide_timeup_window,
            commands::close_timeup_window,
            commands::start_drag,
            commands::save_window_position,
            commands::open_devtools,
            commands::exit_app,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
