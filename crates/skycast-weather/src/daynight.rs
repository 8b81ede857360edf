//! Day/night classification from sunrise and sunset timestamps.

use chrono::Utc;

/// True when `now` falls before sunrise or after sunset.
///
/// All three values are Unix timestamps in seconds. Exactly at sunrise or
/// sunset counts as day.
pub fn is_night(now: i64, sunrise: i64, sunset: i64) -> bool {
    now < sunrise || now > sunset
}

/// [`is_night`] against the current wall clock.
pub fn is_night_now(sunrise: i64, sunset: i64) -> bool {
    is_night(Utc::now().timestamp(), sunrise, sunset)
}
