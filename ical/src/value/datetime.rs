// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Date and date-time values as defined in RFC 5545 Sections 3.3.4 and 3.3.5.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;

use crate::value::{ValueError, parse_digits};

/// A `DATE` or `DATE-TIME` value.
///
/// The time zone of a floating value comes from the `TZID` parameter of the
/// property, or from the reader's local zone when there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueDateTime {
    /// `DATE`, e.g. `19970714`
    Date(Date),

    /// `DATE-TIME` without the UTC designator, e.g. `19980118T230000`
    Floating(DateTime),

    /// `DATE-TIME` in UTC, e.g. `19980119T070000Z`
    Utc(Timestamp),
}

impl ValueDateTime {
    /// Whether this is a `DATE` value.
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

impl FromStr for ValueDateTime {
    type Err = ValueError;

    /// Format Definition:
    ///
    /// ```txt
    /// date-value  = date-fullyear date-month date-mday
    /// date-time   = date "T" time
    /// time        = time-hour time-minute time-second [time-utc]
    /// time-utc    = "Z"
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(['T', 't']) {
            None => parse_date(s)
                .map(Self::Date)
                .ok_or_else(|| ValueError::Date(s.to_string())),
            Some((date, time)) => {
                let err = || ValueError::DateTime(s.to_string());
                let date = parse_date(date).ok_or_else(err)?;
                let (time, utc) = match time.strip_suffix(['Z', 'z']) {
                    Some(time) => (time, true),
                    None => (time, false),
                };
                let time = parse_time(time).ok_or_else(err)?;
                let dt = date.to_datetime(time);
                if utc {
                    let ts = dt.to_zoned(TimeZone::UTC).map_err(|_| err())?;
                    Ok(Self::Utc(ts.timestamp()))
                } else {
                    Ok(Self::Floating(dt))
                }
            }
        }
    }
}

fn parse_date(s: &str) -> Option<Date> {
    if s.len() != 8 {
        return None;
    }
    let year = parse_digits::<i16>(s.get(0..4)?)?;
    let month = parse_digits::<i8>(s.get(4..6)?)?;
    let day = parse_digits::<i8>(s.get(6..8)?)?;
    Date::new(year, month, day).ok()
}

fn parse_time(s: &str) -> Option<Time> {
    if s.len() != 6 {
        return None;
    }
    let hour = parse_digits::<i8>(s.get(0..2)?)?;
    let minute = parse_digits::<i8>(s.get(2..4)?)?;
    let second = parse_digits::<i8>(s.get(4..6)?)?;
    Time::new(hour, minute, second, 0).ok()
}

impl fmt::Display for ValueDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write_date(f, *date),
            Self::Floating(dt) => write_date_time(f, *dt),
            Self::Utc(ts) => {
                write_date_time(f, TimeZone::UTC.to_datetime(*ts))?;
                f.write_str("Z")
            }
        }
    }
}

fn write_date(f: &mut fmt::Formatter<'_>, date: Date) -> fmt::Result {
    write!(f, "{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

fn write_date_time(f: &mut fmt::Formatter<'_>, dt: DateTime) -> fmt::Result {
    write_date(f, dt.date())?;
    write!(f, "T{:02}{:02}{:02}", dt.hour(), dt.minute(), dt.second())
}

/// Parse a COMMA-separated list of date or date-time values, as used by
/// `EXDATE` and `RDATE`.
///
/// # Errors
///
/// Returns the first value that fails to parse.
pub fn parse_date_time_list(s: &str) -> Result<Vec<ValueDateTime>, ValueError> {
    s.split(',')
        .filter(|v| !v.trim().is_empty())
        .map(str::parse)
        .collect()
}
