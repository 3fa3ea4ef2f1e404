//! Main-window position persistence
//!
//! Saves the window position after a drag ends and restores it at
//! startup. Best-effort only; failures are logged and ignored.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Persisted window geometry. All fields optional so a partially
/// written or older file still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowState {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Service for loading and saving the main-window state
#[derive(Clone)]
pub struct WindowStateService {
    state_path: PathBuf,
}

impl WindowStateService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            state_path: app_data_dir.join("window_state.json"),
        }
    }

    /// Load the saved window state, or defaults when absent or corrupt
    pub async fn load(&self) -> WindowState {
        if !self.state_path.exists() {
            return WindowState::default();
        }

        match fs::read_to_string(&self.state_path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse window state, using defaults: {}", e);
                WindowState::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read window state, using defaults: {}", e);
                WindowState::default()
            }
        }
    }

    /// Save the window state to disk
    pub async fn save(&self, state: &WindowState) -> Result<()> {
        let content = serde_json::to_string(state)?;
        fs::write(&self.state_path, content).await?;
        tracing::debug!("Window state saved: {:?}", state);
        Ok(())
    }
}
