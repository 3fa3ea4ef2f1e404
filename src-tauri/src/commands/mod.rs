//! Tauri commands exposed to the frontend
//!
//! This module organizes commands into logical submodules:
//! - `timer`: countdown operations, digit entry and the tick source
//! - `settings`: presentation settings
//! - `windows`: window plumbing (time's up window, drag, devtools, exit)

pub mod settings;
pub mod timer;
pub mod windows;

// Re-export all commands for convenient registration in main.rs
pub use settings::*;
pub use timer::*;
pub use windows::*;

/// Application information structure
#[derive(serde::Serialize)]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
}

/// Get application information
#[tauri::command]
pub async fn get_app_info(
    state: tauri::State<'_, crate::app::AppState>,
) -> crate::error::Result<AppInfo> {
    Ok(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
    })
}
