//! Digit-shift time entry
//!
//! Converts a stream of single decimal digits into a minutes/seconds
//! pair with a fixed-width shift register: the current duration is
//! rendered as a zero-padded `MMSS` string, the leftmost character is
//! dropped and the new digit appended on the right.
//!
//! The shift applies no clamping of its own, so rapid entry can produce
//! seconds up to 99 while the increment/decrement controls stay bounded
//! at 59. That asymmetry matches the shipped behavior and is kept.

use crate::error::{AppError, Result};

use super::timer::SetTime;

/// Shift one digit into the current `(minutes, seconds)` pair.
///
/// Example: 00:02 + `3` → "0002" → "0023" → 00:23; then + `1` → 02:31.
pub fn shift_digit(minutes: u16, seconds: u16, digit: u8) -> Result<SetTime> {
    if digit > 9 {
        return Err(AppError::Internal(format!(
            "digit entry out of range: {}",
            digit
        )));
    }

    let current = format!("{:02}{:02}", minutes, seconds);
    let shifted = format!("{}{}", &current[1..], digit);

    // The register is fixed at four characters; anything else means the
    // stored duration escaped its bounds and the input must be dropped.
    if shifted.len() != 4 {
        return Err(AppError::Internal(format!(
            "digit shift produced {} characters from {:02}:{:02}",
            shifted.len(),
            minutes,
            seconds
        )));
    }

    let new_minutes: u16 = shifted[0..2]
        .parse()
        .map_err(|e| AppError::Internal(format!("unparsable minutes in shift result: {}", e)))?;
    let new_seconds: u16 = shifted[2..4]
        .parse()
        .map_err(|e| AppError::Internal(format!("unparsable seconds in shift result: {}", e)))?;

    Ok(SetTime {
        minutes: new_minutes,
        seconds: new_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts_left_and_appends() {
        let first = shift_digit(0, 2, 3).unwrap();
        assert_eq!(first.minutes, 0);
        assert_eq!(first.seconds, 23);

        let second = shift_digit(first.minutes, first.seconds, 1).unwrap();
        assert_eq!(second.minutes, 2);
        assert_eq!(second.seconds, 31);
    }

    #[test]
    fn builds_up_from_zero() {
        let mut time = SetTime {
            minutes: 0,
            seconds: 0,
        };
        for digit in [1, 2, 3, 4] {
            time = shift_digit(time.minutes, time.seconds, digit).unwrap();
        }
        assert_eq!(time.minutes, 12);
        assert_eq!(time.seconds, 34);
    }

    #[test]
    fn seconds_may_exceed_fifty_nine() {
        // Legacy behavior: the shift does not enforce the seconds bound
        let time = shift_digit(0, 9, 9).unwrap();
        assert_eq!(time.minutes, 0);
        assert_eq!(time.seconds, 99);
    }

    #[test]
    fn leading_minutes_digit_falls_off() {
        let time = shift_digit(95, 30, 7).unwrap();
        assert_eq!(time.minutes, 53);
        assert_eq!(time.seconds, 7);
    }

    #[test]
    fn rejects_non_decimal_digit() {
        assert!(shift_digit(0, 0, 10).is_err());
    }
}
