//! Services module
//!
//! Host-integration services that sit between the commands and the
//! countdown core: persistence and alarm playback.

pub mod audio;
pub mod settings;
pub mod window_state;

pub use audio::AlarmPlayer;
pub use settings::{AppSettings, DisplayMode, SettingsService};
pub use window_state::{WindowState, WindowStateService};
