//! Countdown core
//!
//! The timer state machine and the digit-shift time entry algorithm.
//! This module has no Tauri or I/O dependencies so it can be tested
//! directly.

pub mod entry;
pub mod timer;

pub use timer::{ExpiryBehavior, SetTime, TickOutcome, TimerCore, TimerDocument, TimerSnapshot};
