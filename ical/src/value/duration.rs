// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Duration value type as defined in RFC 5545 Section 3.3.6.

use std::fmt;
use std::str::FromStr;

use jiff::{SignedDuration, Span};

use crate::value::{ValueError, parse_digits};

/// Duration Value defined in RFC 5545 Section 3.3.6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDuration {
    /// Date and Time Duration
    DateTime {
        /// Whether the duration is positive
        positive: bool,
        /// Day Duration
        day: u32,
        /// Hour Duration
        hour: u32,
        /// Minute Duration
        minute: u32,
        /// Second Duration
        second: u32,
    },

    /// Week Duration
    Week {
        /// Whether the duration is positive
        positive: bool,
        /// Week Duration
        week: u32,
    },
}

impl ValueDuration {
    /// Build a duration from a signed number of seconds, split into days,
    /// hours, minutes and seconds.
    #[must_use]
    pub fn from_seconds(seconds: i64) -> Self {
        let positive = seconds >= 0;
        let total = seconds.unsigned_abs();
        let clamp = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);
        Self::DateTime {
            positive,
            day: clamp(total / 86_400),
            hour: clamp(total % 86_400 / 3_600),
            minute: clamp(total % 3_600 / 60),
            second: clamp(total % 60),
        }
    }

    /// Whether the duration points forward in time.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        match self {
            Self::DateTime { positive, .. } | Self::Week { positive, .. } => *positive,
        }
    }

    /// Convert to a calendar span; days and weeks stay nominal, so adding the
    /// span to a zoned time keeps the wall clock across DST transitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a unit is beyond the range `jiff` supports.
    pub fn to_span(&self) -> Result<Span, jiff::Error> {
        let span = match *self {
            Self::Week { week, .. } => Span::new().try_weeks(i64::from(week))?,
            Self::DateTime {
                day,
                hour,
                minute,
                second,
                ..
            } => Span::new()
                .try_days(i64::from(day))?
                .try_hours(i64::from(hour))?
                .try_minutes(i64::from(minute))?
                .try_seconds(i64::from(second))?,
        };
        Ok(if self.is_positive() { span } else { span.negate() })
    }

    /// Exact length of the duration, taking days as 24 hours.
    #[must_use]
    pub fn to_signed_duration(&self) -> SignedDuration {
        let secs = match *self {
            Self::Week { week, .. } => i64::from(week) * 7 * 86_400,
            Self::DateTime {
                day,
                hour,
                minute,
                second,
                ..
            } => {
                i64::from(day) * 86_400
                    + i64::from(hour) * 3_600
                    + i64::from(minute) * 60
                    + i64::from(second)
            }
        };
        SignedDuration::from_secs(if self.is_positive() { secs } else { -secs })
    }
}

impl FromStr for ValueDuration {
    type Err = ValueError;

    /// Format Definition:
    ///
    /// ```txt
    /// dur-value  = (["+"] / "-") "P" (dur-date / dur-time / dur-week)
    ///
    /// dur-date   = dur-day [dur-time]
    /// dur-time   = "T" (dur-hour / dur-minute / dur-second)
    /// dur-week   = 1*DIGIT "W"
    /// dur-hour   = 1*DIGIT "H" [dur-minute]
    /// dur-minute = 1*DIGIT "M" [dur-second]
    /// dur-second = 1*DIGIT "S"
    /// dur-day    = 1*DIGIT "D"
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ValueError::Duration(s.to_string());

        let trimmed = s.trim();
        let (positive, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let rest = rest.strip_prefix('P').ok_or_else(err)?;

        if let Some(week) = rest.strip_suffix('W') {
            let week = parse_digits(week).ok_or_else(err)?;
            return Ok(Self::Week { positive, week });
        }

        let (date_part, time_part) = match rest.split_once('T') {
            Some((d, t)) if !t.is_empty() => (d, Some(t)),
            Some(_) => return Err(err()),
            None => (rest, None),
        };

        let mut day = 0;
        if !date_part.is_empty() {
            let d = date_part.strip_suffix('D').ok_or_else(err)?;
            day = parse_digits(d).ok_or_else(err)?;
        } else if time_part.is_none() {
            return Err(err());
        }

        let (mut hour, mut minute, mut second) = (0, 0, 0);
        if let Some(mut t) = time_part {
            // designators must appear in H, M, S order
            let mut last = 0;
            while !t.is_empty() {
                let pos = t.find(['H', 'M', 'S']).ok_or_else(err)?;
                let (digits, tail) = t.split_at(pos);
                let value: u32 = parse_digits(digits).ok_or_else(err)?;
                let (rank, slot) = match tail.chars().next() {
                    Some('H') => (1, &mut hour),
                    Some('M') => (2, &mut minute),
                    _ => (3, &mut second),
                };
                if rank <= last {
                    return Err(err());
                }
                last = rank;
                *slot = value;
                t = tail.get(1..).unwrap_or_default();
            }
        }

        Ok(Self::DateTime {
            positive,
            day,
            hour,
            minute,
            second,
        })
    }
}

impl fmt::Display for ValueDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_positive() {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        match *self {
            Self::Week { week, .. } => write!(f, "{week}W"),
            Self::DateTime {
                day,
                hour,
                minute,
                second,
                ..
            } => {
                if day > 0 {
                    write!(f, "{day}D")?;
                }
                if hour == 0 && minute == 0 && second == 0 {
                    return if day == 0 { f.write_str("T0S") } else { Ok(()) };
                }
                f.write_str("T")?;
                if hour > 0 {
                    write!(f, "{hour}H")?;
                }
                if minute > 0 || (hour > 0 && second > 0) {
                    write!(f, "{minute}M")?;
                }
                if second > 0 {
                    write!(f, "{second}S")?;
                }
                Ok(())
            }
        }
    }
}
