//! Integration tests for Lightning Timer
//!
//! These tests drive the countdown core and the persistence services
//! together the way the command layer does: digit entry feeds the state
//! machine, the tick advances it to expiry, and the timer document
//! round-trips through the settings store.

use lightning_timer::core::{ExpiryBehavior, SetTime, TickOutcome, TimerCore};
use lightning_timer::services::settings::{AppSettings, DisplayMode};
use lightning_timer::services::SettingsService;
use tempfile::TempDir;

fn no_window() -> ExpiryBehavior {
    ExpiryBehavior {
        show_timeup_window: false,
    }
}

#[test]
fn test_full_countdown_cycle_with_restore() {
    let mut core = TimerCore::new();

    // User types 1-0-5 on the keypad: 0:00 -> 0:01 -> 0:10 -> 1:05
    for digit in [1, 0, 5] {
        core.enter_digit(digit).unwrap();
    }
    let snap = core.snapshot();
    assert_eq!((snap.minutes, snap.seconds), (1, 5));
    assert_eq!(snap.time_remaining, 65);

    // Start remembers the edited duration
    assert!(core.start());
    assert_eq!(
        core.last_set_time(),
        Some(SetTime {
            minutes: 1,
            seconds: 5,
        })
    );

    // Run the whole countdown down to expiry
    let mut expiries = 0;
    for _ in 0..65 {
        match core.tick(no_window()) {
            TickOutcome::Running => {}
            TickOutcome::Expired { start_alarm, .. } => {
                assert!(start_alarm);
                expiries += 1;
            }
            TickOutcome::Idle => panic!("tick went idle mid-countdown"),
        }
        let snap = core.snapshot();
        assert_eq!(
            snap.time_remaining,
            u32::from(snap.minutes) * 60 + u32::from(snap.seconds)
        );
    }
    assert_eq!(expiries, 1);

    // Expiry restored the remembered duration and stopped the countdown
    let snap = core.snapshot();
    assert_eq!((snap.minutes, snap.seconds), (1, 5));
    assert_eq!(snap.time_remaining, 65);
    assert!(!snap.is_running);
    assert!(!snap.is_paused);
    assert!(snap.is_expired_visual);

    // Further ticks are inert; the tick source is gone
    assert_eq!(core.tick(no_window()), TickOutcome::Idle);
}

#[test]
fn test_pause_resume_keeps_remembered_time() {
    let mut core = TimerCore::new();
    core.enter_digit(3).unwrap();
    core.enter_digit(0).unwrap(); // 0:30
    core.start();

    for _ in 0..10 {
        core.tick(no_window());
    }
    core.pause();
    let paused = core.snapshot();
    assert_eq!(paused.time_remaining, 20);
    assert!(paused.is_paused);

    // Resuming without an edit keeps the remembered 0:30
    core.start();
    assert_eq!(
        core.last_set_time(),
        Some(SetTime {
            minutes: 0,
            seconds: 30,
        })
    );
}

#[test]
fn test_digit_entry_overrun_seconds_survive_countdown() {
    let mut core = TimerCore::new();
    // Rapid digit entry can legally produce 0:99
    core.enter_digit(9).unwrap();
    core.enter_digit(9).unwrap();
    let snap = core.snapshot();
    assert_eq!((snap.minutes, snap.seconds), (0, 99));
    assert_eq!(snap.time_remaining, 99);

    core.start();
    // After the first tick the display normalizes to 1:38
    core.tick(no_window());
    let snap = core.snapshot();
    assert_eq!((snap.minutes, snap.seconds), (1, 38));
    assert_eq!(snap.time_remaining, 98);
}

#[tokio::test]
async fn test_timer_document_round_trip_through_store() {
    let temp_dir = TempDir::new().unwrap();
    let service = SettingsService::new(temp_dir.path().to_path_buf());

    // Session one: configure and start a timer, then persist its
    // document the way the digit-entry path does
    let doc = {
        let mut core = TimerCore::new();
        core.enter_digit(2).unwrap();
        core.enter_digit(3).unwrap();
        core.enter_digit(0).unwrap(); // 2:30
        core.start();
        core.document()
    };
    service.save_timer(&doc).await.unwrap();

    // Session two: a fresh core restored from the store
    let mut core = TimerCore::new();
    core.restore(service.load_timer().await);

    let snap = core.snapshot();
    assert_eq!((snap.minutes, snap.seconds), (2, 30));
    assert_eq!(snap.time_remaining, 150);
    assert_eq!(
        core.last_set_time(),
        Some(SetTime {
            minutes: 2,
            seconds: 30,
        })
    );

    // The restored remembered time still drives expiry restoration
    core.set_time(0, 1);
    core.start();
    core.tick(ExpiryBehavior {
        show_timeup_window: true,
    });
    let snap = core.snapshot();
    assert_eq!((snap.minutes, snap.seconds), (2, 30));
}

#[tokio::test]
async fn test_settings_and_timer_sections_coexist() {
    let temp_dir = TempDir::new().unwrap();
    let service = SettingsService::new(temp_dir.path().to_path_buf());

    let settings = AppSettings {
        dark_mode: true,
        display_mode: DisplayMode::Minimal,
        alarm_volume: 0.25,
        ..AppSettings::default()
    };
    service.save_settings(&settings).await.unwrap();

    let mut core = TimerCore::new();
    core.enter_digit(5).unwrap();
    service.save_timer(&core.document()).await.unwrap();

    // Both sections survive independent writes
    let loaded_settings = service.load_settings().await;
    assert!(loaded_settings.dark_mode);
    assert_eq!(loaded_settings.display_mode, DisplayMode::Minimal);
    assert_eq!(loaded_settings.alarm_volume, 0.25);

    let loaded_timer = service.load_timer().await;
    assert_eq!(loaded_timer.seconds, 5);
}

#[test]
fn test_alarm_retry_after_playback_failure() {
    let mut core = TimerCore::new();
    core.set_time(0, 1);
    core.start();

    let outcome = core.tick(no_window());
    assert!(matches!(
        outcome,
        TickOutcome::Expired {
            start_alarm: true,
            ..
        }
    ));

    // Playback failed: the guard is cleared so the next expiry retries
    core.alarm_failed();
    core.set_time(0, 1);
    core.start();
    let outcome = core.tick(no_window());
    assert!(matches!(
        outcome,
        TickOutcome::Expired {
            start_alarm: true,
            ..
        }
    ));
}
