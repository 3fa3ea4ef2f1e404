//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the application.

// ===== Window Labels =====

/// Label of the main timer window
pub const MAIN_WINDOW_LABEL: &str = "main";

/// Label of the secondary "time's up" window
pub const TIMEUP_WINDOW_LABEL: &str = "timeup";

// ===== Countdown Bounds =====

/// Maximum minutes settable on the countdown (two display digits)
pub const MAX_MINUTES: u16 = 99;

/// Maximum seconds settable via the increment/decrement controls.
/// Digit-shift entry can exceed this, up to [`MAX_ENTRY_SECONDS`].
pub const MAX_SECONDS: u16 = 59;

/// Maximum seconds the display can hold: two 9s in the seconds half of
/// the shift register. Persisted durations are clamped against this.
pub const MAX_ENTRY_SECONDS: u16 = 99;

// ===== Tick Source =====

/// Countdown tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1_000;

/// Delay before showing the time's-up window after expiry, in milliseconds.
/// Audio start takes priority over window creation.
pub const TIMEUP_WINDOW_DELAY_MS: u64 = 100;

// ===== Alarm Sounds =====

/// Sound identifiers bundled with the application.
/// Settings updates reject anything not in this list.
pub const VALID_ALARM_SOUNDS: &[&str] = &[
    "alarm.mp3",
    "gong.mp3",
    "marimba.mp3",
    "pulse.mp3",
    "symbal.mp3",
];

/// Default alarm sound identifier
pub const DEFAULT_ALARM_SOUND: &str = "alarm.mp3";

/// Default alarm volume, in [0.0, 1.0]
pub const DEFAULT_ALARM_VOLUME: f32 = 0.8;

// ===== Window Dimensions =====

/// Main window size in normal display mode, in logical pixels
pub const NORMAL_WINDOW_SIZE: (f64, f64) = (800.0, 200.0);

/// Main window size in compact display mode
pub const COMPACT_WINDOW_SIZE: (f64, f64) = (400.0, 200.0);

/// Main window size in minimal display mode (digits only)
pub const MINIMAL_WINDOW_SIZE: (f64, f64) = (260.0, 120.0);

/// Time's-up window size
pub const TIMEUP_WINDOW_SIZE: (f64, f64) = (400.0, 300.0);
