//! Countdown timer state machine
//!
//! Owns the remaining time, the running/paused flags, the remembered
//! "last set" duration and the alarm guards. All mutation goes through
//! the methods here; the command layer holds the single instance behind
//! the app-state mutex and never touches the fields directly.
//!
//! Invariant: `time_remaining == minutes * 60 + seconds` before and after
//! every operation.

use serde::{Deserialize, Serialize};

use super::entry;
use crate::config;
use crate::error::Result;

/// A minutes/seconds pair as configured by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTime {
    pub minutes: u16,
    pub seconds: u16,
}

impl SetTime {
    pub fn total_seconds(self) -> u32 {
        u32::from(self.minutes) * 60 + u32::from(self.seconds)
    }
}

/// Persisted timer document: the displayed duration plus the remembered
/// "last set" duration. Missing fields default so stale files keep loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerDocument {
    pub minutes: u16,
    pub seconds: u16,
    pub last_set_time: Option<SetTime>,
}

/// Snapshot sent to the presentation layer after every mutation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub minutes: u16,
    pub seconds: u16,
    pub time_remaining: u32,
    pub is_running: bool,
    pub is_paused: bool,
    pub is_expired_visual: bool,
}

/// Expiry inputs, read from settings at tick time and passed explicitly.
/// The tick handler never reaches into a captured settings environment.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryBehavior {
    pub show_timeup_window: bool,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or already at zero; nothing happened
    Idle,
    /// Decremented and still counting
    Running,
    /// The countdown reached zero on this tick
    Expired {
        /// Start the alarm sound (false when a previous alarm instance
        /// is still unacknowledged)
        start_alarm: bool,
        /// Show the time's-up window (gated by settings and by the
        /// once-per-dismissal window guard)
        show_timeup_window: bool,
    },
}

/// The countdown state machine
#[derive(Debug)]
pub struct TimerCore {
    minutes: u16,
    seconds: u16,
    time_remaining: u32,
    is_running: bool,
    is_paused: bool,
    last_set_time: Option<SetTime>,
    has_been_edited: bool,
    alarm_sounding: bool,
    timeup_window_shown: bool,
    expired_visual: bool,
}

impl Default for TimerCore {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerCore {
    pub fn new() -> Self {
        Self {
            minutes: 0,
            seconds: 0,
            time_remaining: 0,
            is_running: false,
            is_paused: false,
            last_set_time: None,
            has_been_edited: false,
            alarm_sounding: false,
            timeup_window_shown: false,
            expired_visual: false,
        }
    }

    /// Seed the displayed duration and the remembered time from a
    /// persisted document. Used once at startup, before any ticking.
    ///
    /// Fields are clamped to the displayable range; a hand-edited store
    /// file must not be able to seed an inconsistent state.
    pub fn restore(&mut self, doc: TimerDocument) {
        let minutes = doc.minutes.min(config::MAX_MINUTES);
        let seconds = doc.seconds.min(config::MAX_ENTRY_SECONDS);
        if minutes != doc.minutes || seconds != doc.seconds {
            tracing::warn!(
                "Persisted duration {}:{} out of range, clamped to {:02}:{:02}",
                doc.minutes,
                doc.seconds,
                minutes,
                seconds
            );
        }
        self.minutes = minutes;
        self.seconds = seconds;
        self.time_remaining = u32::from(minutes) * 60 + u32::from(seconds);
        self.last_set_time = doc.last_set_time.map(|t| SetTime {
            minutes: t.minutes.min(config::MAX_MINUTES),
            seconds: t.seconds.min(config::MAX_ENTRY_SECONDS),
        });
    }

    /// The document to persist: displayed duration plus remembered time
    pub fn document(&self) -> TimerDocument {
        TimerDocument {
            minutes: self.minutes,
            seconds: self.seconds,
            last_set_time: self.last_set_time,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            minutes: self.minutes,
            seconds: self.seconds,
            time_remaining: self.time_remaining,
            is_running: self.is_running,
            is_paused: self.is_paused,
            is_expired_visual: self.expired_visual,
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn last_set_time(&self) -> Option<SetTime> {
        self.last_set_time
    }

    pub fn has_been_edited(&self) -> bool {
        self.has_been_edited
    }

    /// Set the displayed duration. Deliberately has no running-state
    /// guard; the UI disables the adjustment controls while running.
    pub fn set_time(&mut self, minutes: u16, seconds: u16) {
        self.minutes = minutes;
        self.seconds = seconds;
        self.time_remaining = u32::from(minutes) * 60 + u32::from(seconds);
    }

    /// Set minutes from the increment/decrement controls, clamped to
    /// [0, 99]. Does not mark the timer as edited.
    pub fn set_minutes(&mut self, minutes: u16) {
        self.set_time(minutes.min(config::MAX_MINUTES), self.seconds);
    }

    /// Set seconds from the increment/decrement controls, clamped to
    /// [0, 59]. Does not mark the timer as edited.
    pub fn set_seconds(&mut self, seconds: u16) {
        self.set_time(self.minutes, seconds.min(config::MAX_SECONDS));
    }

    /// Feed one decimal digit through the shift-register entry.
    ///
    /// Swallowed while the countdown is running (returns `Ok(None)`).
    /// On success the new pair has been applied, the edit flag is set and
    /// any expired presentation state is cleared; the caller persists the
    /// returned pair.
    pub fn enter_digit(&mut self, digit: u8) -> Result<Option<SetTime>> {
        if self.is_running {
            return Ok(None);
        }

        let entered = entry::shift_digit(self.minutes, self.seconds, digit)?;
        self.set_time(entered.minutes, entered.seconds);
        self.has_been_edited = true;
        self.expired_visual = false;
        Ok(Some(entered))
    }

    /// Start the countdown. Returns false (and does nothing) at 00:00.
    ///
    /// Captures `last_set_time` when an edit happened since the previous
    /// capture; a start after a pause with no intervening edit keeps the
    /// remembered time untouched. The caller halts any in-progress alarm.
    pub fn start(&mut self) -> bool {
        if self.minutes == 0 && self.seconds == 0 {
            return false;
        }

        if self.has_been_edited {
            self.last_set_time = Some(SetTime {
                minutes: self.minutes,
                seconds: self.seconds,
            });
            self.has_been_edited = false;
            tracing::debug!(
                "Remembered last set time: {:02}:{:02}",
                self.minutes,
                self.seconds
            );
        }

        self.is_running = true;
        self.is_paused = false;
        self.alarm_sounding = false;
        self.expired_visual = false;
        true
    }

    /// Pause the countdown. Only meaningful while running.
    pub fn pause(&mut self) {
        if !self.is_running {
            return;
        }
        self.is_running = false;
        self.is_paused = true;
    }

    /// Reset to idle: zero the duration and forget the remembered time.
    pub fn reset(&mut self) {
        self.last_set_time = None;
        self.has_been_edited = false;
        self.is_running = false;
        self.is_paused = false;
        self.set_time(0, 0);
        self.expired_visual = false;
    }

    /// Advance the countdown by one second.
    ///
    /// Expiry is a transition out of Running, not a persisted state: the
    /// remembered duration (if any) is restored and the timer stops.
    /// The alarm and window guards make the expiry signals idempotent;
    /// a second tick that would expire while a previous alarm is still
    /// unacknowledged starts nothing.
    pub fn tick(&mut self, expiry: ExpiryBehavior) -> TickOutcome {
        if !self.is_running || self.time_remaining == 0 {
            return TickOutcome::Idle;
        }

        self.time_remaining -= 1;

        if self.time_remaining > 0 {
            self.minutes = (self.time_remaining / 60) as u16;
            self.seconds = (self.time_remaining % 60) as u16;
            return TickOutcome::Running;
        }

        let start_alarm = !self.alarm_sounding;
        self.alarm_sounding = true;

        let show_timeup_window = expiry.show_timeup_window && !self.timeup_window_shown;
        if show_timeup_window {
            self.timeup_window_shown = true;
        }

        self.expired_visual = true;
        self.is_running = false;
        self.is_paused = false;

        match self.last_set_time {
            Some(remembered) => {
                self.minutes = remembered.minutes;
                self.seconds = remembered.seconds;
                self.time_remaining = remembered.total_seconds();
            }
            None => {
                self.minutes = 0;
                self.seconds = 0;
                self.time_remaining = 0;
            }
        }

        TickOutcome::Expired {
            start_alarm,
            show_timeup_window,
        }
    }

    /// Acknowledge an expired alarm from any user interaction: clears
    /// the alarm guard and the time's-up visual. Idempotent; the caller
    /// stops the audio (also idempotent).
    pub fn dismiss_alarm(&mut self) {
        self.alarm_sounding = false;
        self.expired_visual = false;
    }

    /// Acknowledge via the cross-window dismissal signal. Additionally
    /// clears the window guard so a future expiry re-opens the window.
    pub fn dismiss_from_timeup_window(&mut self) {
        self.dismiss_alarm();
        self.timeup_window_shown = false;
    }

    /// Alarm playback failed: clear the guard so a future expiry retries.
    pub fn alarm_failed(&mut self) {
        self.alarm_sounding = false;
    }
}
