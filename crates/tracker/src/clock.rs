//! Wall-clock helpers.
//!
//! All times are naive local times on the service day. Minute offsets are plain
//! `i64` counts since midnight and are allowed to leave the `[0, 1440)` range
//! until they are formatted.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

use crate::models::types::{Session, TrackerError};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Rendered in place of a time that cannot be known.
pub const PLACEHOLDER: &str = "--:--";

/// A minute of the day, always within `[00:00, 23:59]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Wraps any minute offset onto a 24 hour clock (floor modulo).
    pub fn wrapping(minutes: i64) -> Self {
        Self(minutes.rem_euclid(MINUTES_PER_DAY) as u16)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Hours and minutes of an instant; seconds are dropped, not rounded.
    pub fn of<T: Timelike>(instant: &T) -> Self {
        Self((instant.hour() * 60 + instant.minute()) as u16)
    }

    pub fn minute_of_day(self) -> i64 {
        i64::from(self.0)
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    pub fn add_minutes(self, minutes: i64) -> Self {
        Self::wrapping(self.minute_of_day().wrapping_add(minutes))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Strict `HH:MM` parse, used when reading rendered statuses back.
impl FromStr for ClockTime {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TrackerError::InvalidClockTime(s.to_string());

        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(invalid());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let hour = h.parse().map_err(|_| invalid())?;
        let minute = m.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

/// Parses the leading integer of `s`, ignoring leading whitespace and any
/// trailing garbage: `"07"` is 7, `"12min"` is 12, `"abc"` is `None`.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Converts `"HH:MM"` into minutes since midnight.
///
/// Returns `None` when the string is absent, has no colon, or either side does
/// not start with an integer. The range is deliberately not checked, so
/// `"25:99"` yields 1599; only the first two colon-separated parts are read.
pub fn parse_clock(hm: Option<&str>) -> Option<i64> {
    let hm = hm?;
    let mut parts = hm.split(':');
    let hour = parse_leading_int(parts.next()?)?;
    let minute = parse_leading_int(parts.next()?)?;
    hour.checked_mul(60)?.checked_add(minute)
}

/// Formats a minute offset as `HH:MM` after wrapping it onto a 24 hour clock.
pub fn format_clock(minutes: i64) -> String {
    ClockTime::wrapping(minutes).to_string()
}

/// Formats an instant as `HH:MM`, or the placeholder when it is absent.
pub fn format_instant<T: Timelike>(instant: Option<&T>) -> String {
    match instant {
        Some(instant) => ClockTime::of(instant).to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Morning run before noon, afternoon run from noon on.
pub fn default_session(now: NaiveTime) -> Session {
    if now.hour() < 12 {
        Session::Am
    } else {
        Session::Pm
    }
}
