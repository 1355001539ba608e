// Wall-clock helpers for reminder matching
//
// Reminders fire on exact hour:minute equality between an event's stored
// `HH:MM` time and the current wall clock in the configured zone.

use crate::errors::ScheduleError;
use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

/// Get the default zone reminders are evaluated in
///
/// `Etc/GMT-3` is the fixed-offset UTC+3 zone (the POSIX sign convention is
/// inverted relative to the offset).
pub fn default_timezone() -> Tz {
    chrono_tz::Etc::GMTMinus3
}

/// Parse an event's scheduled wall-clock time stored as `HH:MM`
pub fn parse_event_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| {
        ScheduleError::InvalidEventTime {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Get the current hour and minute on the wall clock of the given zone
pub fn local_minute(now: DateTime<Utc>, tz: Tz) -> (u32, u32) {
    let local = now.with_timezone(&tz);
    (local.hour(), local.minute())
}
