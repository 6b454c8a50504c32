//! Hour angles and transit times.
//!
//! `uvgen` simulates an observation by hour-angle range around a time of zero
//! hour angle. For each segment we therefore need the instant the pointing
//! transits, and the hour angles that bracket the segment relative to it.

use std::fmt;

use hifitime::{Duration, Epoch};
use marlu::{precession::get_lmst, LatLngHeight, RADec};

use crate::segments::Segment;

/// The number of sidereal seconds in a solar second.
pub const SIDEREAL_RATE: f64 = 1.00273790935;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// The local mean sidereal time at the array \[hours\]. DUT1 is not known, so
/// it's taken as 0.
pub fn lst_hours(time: Epoch, location: LatLngHeight) -> f64 {
    get_lmst(location.longitude_rad, time, Duration::default()).to_degrees() / 15.0
}

/// Bring an hour angle into (-12, 12] by adding or subtracting a day once.
pub fn normalise_hour_angle(hour_angle: f64) -> f64 {
    if hour_angle > 12.0 {
        hour_angle - 24.0
    } else if hour_angle <= -12.0 {
        hour_angle + 24.0
    } else {
        hour_angle
    }
}

/// The hour angle of `radec` at `time` as seen from `location` \[hours\], in
/// the range (-12, 12].
pub fn hour_angle(radec: RADec, time: Epoch, location: LatLngHeight) -> f64 {
    normalise_hour_angle(lst_hours(time, location) - radec.ra.to_degrees() / 15.0)
}

/// The transit of a pointing nearest a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transit {
    /// The (unrounded) time of zero hour angle.
    pub time: Epoch,

    /// The hour angle at the start of the segment \[hours\].
    pub start_hour_angle: f64,

    /// The hour angle at the end of the segment \[hours\].
    pub end_hour_angle: f64,
}

/// Estimate when `radec` transits by extrapolating from whichever end of the
/// segment is closer to transit, treating the hour angle as solar hours.
///
/// This is a single linear step, not iterated; the error grows with the hour
/// angle of the chosen endpoint (about 10 seconds per hour).
pub fn transit_time(segment: &Segment, radec: RADec, location: LatLngHeight) -> Transit {
    let start_hour_angle = hour_angle(radec, segment.start, location);
    let end_hour_angle = hour_angle(radec, segment.end, location);

    let time = if start_hour_angle.abs() < end_hour_angle.abs() {
        segment.start - Duration::from_seconds(start_hour_angle * SECONDS_PER_HOUR)
    } else {
        segment.end - Duration::from_seconds(end_hour_angle * SECONDS_PER_HOUR)
    };

    Transit {
        time,
        start_hour_angle,
        end_hour_angle,
    }
}

/// The `harange` argument of `uvgen`: whole hours of hour angle either side of
/// transit, and the integration step \[hours\].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourAngleRange {
    pub start: i64,
    pub end: i64,
    pub step: f64,
}

impl fmt::Display for HourAngleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{:.16}", self.start, self.end, self.step)
    }
}

/// The hour-angle range to simulate for `segment`, given the simulation's
/// time of zero hour angle. The segment is widened by half a cycle on each
/// side, converted to sidereal hours, and then widened again to whole hours.
pub fn hour_angle_range(segment: &Segment, transit: Epoch, cycle: Duration) -> HourAngleRange {
    let half_cycle = cycle / 2.0;
    let to_sidereal_hours = |d: Duration| d.to_seconds() / SECONDS_PER_HOUR * SIDEREAL_RATE;

    let start = to_sidereal_hours(segment.start - half_cycle - transit).floor() as i64;
    let mut end = to_sidereal_hours(segment.end + half_cycle - transit).ceil() as i64;
    if end <= start {
        end = start + 1;
    }

    HourAngleRange {
        start,
        end,
        step: cycle.to_seconds() * SIDEREAL_RATE / SECONDS_PER_HOUR,
    }
}
