//! MIRIAD's textual timestamps and the rounding applied to simulation times.
//!
//! MIRIAD writes times as `yyMMMdd:hh:mm:ss.s` (e.g. `13JUL21:03:59:49.9`),
//! with the year counted from 2000. Anything handed back to a MIRIAD task is
//! written the same way without the fractional second, in lower case.

use hifitime::{Duration, Epoch};
use thiserror::Error;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MiriadTimeError {
    #[error("'{0}' is not a MIRIAD timestamp (expected yyMMMdd:hh:mm:ss)")]
    Malformed(String),

    #[error("'{time}' has an unknown month '{month}'")]
    UnknownMonth { time: String, month: String },

    #[error("'{time}' is not a valid date: {err}")]
    InvalidDate { time: String, err: String },
}

/// How the transit time is snapped before it is handed to the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundingPolicy {
    /// Snap to the nearest time whose second-of-minute ends in 5.
    FiveSecond,

    /// Snap to the centre of the cycle-sized bin (counted from UTC midnight)
    /// containing the time.
    CycleCentre(Duration),
}

impl RoundingPolicy {
    pub fn apply(self, time: Epoch) -> Epoch {
        match self {
            RoundingPolicy::FiveSecond => round_to_5_seconds(time),
            RoundingPolicy::CycleCentre(cycle) => round_to_cycle_centre(time, cycle),
        }
    }
}

/// Parse a MIRIAD timestamp. Only the first 18 characters are considered, and
/// the seconds field is rounded to the nearest whole second.
pub fn parse_miriad_time(s: &str) -> Result<Epoch, MiriadTimeError> {
    let malformed = || MiriadTimeError::Malformed(s.to_string());
    if !s.is_ascii() || s.len() < 16 {
        return Err(malformed());
    }
    let field = |range: std::ops::Range<usize>| -> Result<u8, MiriadTimeError> {
        s[range].trim().parse().map_err(|_| malformed())
    };

    let year = 2000 + i32::from(field(0..2)?);
    let month_str = s[2..5].to_ascii_uppercase();
    let month = MONTHS
        .iter()
        .position(|m| *m == month_str)
        .ok_or_else(|| MiriadTimeError::UnknownMonth {
            time: s.to_string(),
            month: s[2..5].to_string(),
        })? as u8
        + 1;
    let day = field(5..7)?;
    if &s[7..8] != ":" || &s[10..11] != ":" || &s[13..14] != ":" {
        return Err(malformed());
    }
    let hour = field(8..10)?;
    let minute = field(11..13)?;
    let seconds: f64 = s[14..s.len().min(18)]
        .trim()
        .parse()
        .map_err(|_| malformed())?;
    if !(0.0..61.0).contains(&seconds) {
        return Err(malformed());
    }

    let start_of_minute = Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, 0, 0)
        .map_err(|e| MiriadTimeError::InvalidDate {
            time: s.to_string(),
            err: e.to_string(),
        })?;
    Ok(start_of_minute + Duration::from_seconds(seconds.round()))
}

/// Format an epoch the way MIRIAD tasks expect it on their command lines,
/// e.g. `13jul21:03:59:50`. Sub-second parts are truncated.
pub fn format_miriad_time(time: Epoch) -> String {
    let (year, month, day, hour, minute, second, _) = time.to_gregorian_utc();
    format!(
        "{:02}{}{day:02}:{hour:02}:{minute:02}:{second:02}",
        year.rem_euclid(100),
        MONTHS[usize::from(month - 1)].to_lowercase(),
    )
}

/// Seconds elapsed since UTC midnight of the epoch's day, and that midnight.
fn split_at_midnight(time: Epoch) -> (Epoch, f64) {
    let (year, month, day, hour, minute, second, nanos) = time.to_gregorian_utc();
    let midnight = Epoch::from_gregorian_utc_at_midnight(year, month, day);
    let seconds = f64::from(hour) * 3600.0
        + f64::from(minute) * 60.0
        + f64::from(second)
        + f64::from(nanos) * 1e-9;
    (midnight, seconds)
}

/// Move the time to the nearest whole second ending in 5, i.e. shift it by
/// `5 - (s mod 10)` seconds where `s` is the whole second-of-minute.
pub fn round_to_5_seconds(time: Epoch) -> Epoch {
    let (midnight, seconds) = split_at_midnight(time);
    let whole = seconds.floor();
    let shift = 5.0 - (whole % 10.0);
    midnight + Duration::from_seconds(whole + shift)
}

/// Move the time to the centre of the `cycle`-long bin containing it, with bins
/// counted from UTC midnight.
pub fn round_to_cycle_centre(time: Epoch, cycle: Duration) -> Epoch {
    let cycle_s = cycle.to_seconds();
    if cycle_s <= 0.0 {
        return time;
    }
    let (midnight, seconds) = split_at_midnight(time);
    let bin = (seconds / cycle_s).floor();
    midnight + Duration::from_seconds(bin * cycle_s + cycle_s / 2.0)
}
