// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rule value type as defined in RFC 5545 Section 3.3.10.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::keyword::{
    KW_RRULE_COUNT, KW_RRULE_FREQ, KW_RRULE_FREQ_DAILY, KW_RRULE_FREQ_HOURLY,
    KW_RRULE_FREQ_MINUTELY, KW_RRULE_FREQ_MONTHLY, KW_RRULE_FREQ_SECONDLY, KW_RRULE_FREQ_WEEKLY,
    KW_RRULE_FREQ_YEARLY, KW_RRULE_INTERVAL, KW_RRULE_UNTIL,
};
use crate::value::{ValueDateTime, ValueError, parse_digits};

/// Recurrence rule
///
/// Only `FREQ`, `INTERVAL`, `UNTIL` and `COUNT` are interpreted. Any other
/// rule part (`BYDAY`, `WKST`, ...) is kept verbatim in [`Self::other`] so it
/// survives a parse and format cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueRecurrenceRule {
    /// Frequency of recurrence
    pub freq: RecurrenceFrequency,
    /// Until date for recurrence
    pub until: Option<ValueDateTime>,
    /// Number of occurrences
    pub count: Option<u32>,
    /// Interval between recurrences
    pub interval: Option<u32>,
    /// Rule parts that are not interpreted, as `(name, value)` pairs
    pub other: Vec<(String, String)>,
}

impl ValueRecurrenceRule {
    /// A rule with only a frequency.
    #[must_use]
    pub const fn new(freq: RecurrenceFrequency) -> Self {
        Self {
            freq,
            until: None,
            count: None,
            interval: None,
            other: Vec::new(),
        }
    }
}

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(missing_docs)]
pub enum RecurrenceFrequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceFrequency::Secondly => write!(f, "{KW_RRULE_FREQ_SECONDLY}"),
            RecurrenceFrequency::Minutely => write!(f, "{KW_RRULE_FREQ_MINUTELY}"),
            RecurrenceFrequency::Hourly => write!(f, "{KW_RRULE_FREQ_HOURLY}"),
            RecurrenceFrequency::Daily => write!(f, "{KW_RRULE_FREQ_DAILY}"),
            RecurrenceFrequency::Weekly => write!(f, "{KW_RRULE_FREQ_WEEKLY}"),
            RecurrenceFrequency::Monthly => write!(f, "{KW_RRULE_FREQ_MONTHLY}"),
            RecurrenceFrequency::Yearly => write!(f, "{KW_RRULE_FREQ_YEARLY}"),
        }
    }
}

impl FromStr for RecurrenceFrequency {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            (KW_RRULE_FREQ_SECONDLY, Self::Secondly),
            (KW_RRULE_FREQ_MINUTELY, Self::Minutely),
            (KW_RRULE_FREQ_HOURLY, Self::Hourly),
            (KW_RRULE_FREQ_DAILY, Self::Daily),
            (KW_RRULE_FREQ_WEEKLY, Self::Weekly),
            (KW_RRULE_FREQ_MONTHLY, Self::Monthly),
            (KW_RRULE_FREQ_YEARLY, Self::Yearly),
        ]
        .into_iter()
        .find_map(|(kw, freq)| s.eq_ignore_ascii_case(kw).then_some(freq))
        .ok_or_else(|| ValueError::RecurrenceRule(format!("unknown frequency {s}")))
    }
}

impl FromStr for ValueRecurrenceRule {
    type Err = ValueError;

    /// Format Definition:
    ///
    /// ```txt
    /// recur           = recur-rule-part *( ";" recur-rule-part )
    /// recur-rule-part = ( "FREQ" "=" freq )
    ///                 / ( "UNTIL" "=" enddate )
    ///                 / ( "COUNT" "=" 1*DIGIT )
    ///                 / ( "INTERVAL" "=" 1*DIGIT )
    ///                 / ...
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |msg: &str| ValueError::RecurrenceRule(format!("{msg} in {s}"));

        let mut freq = None;
        let mut until = None;
        let mut count = None;
        let mut interval = None;
        let mut other = Vec::new();

        for part in s.trim().split(';').filter(|p| !p.is_empty()) {
            let (name, value) = part.split_once('=').ok_or_else(|| err("missing '='"))?;
            if name.eq_ignore_ascii_case(KW_RRULE_FREQ) {
                freq = Some(value.parse()?);
            } else if name.eq_ignore_ascii_case(KW_RRULE_UNTIL) {
                until = Some(value.parse()?);
            } else if name.eq_ignore_ascii_case(KW_RRULE_COUNT) {
                count = Some(parse_digits(value).ok_or_else(|| err("invalid COUNT"))?);
            } else if name.eq_ignore_ascii_case(KW_RRULE_INTERVAL) {
                match parse_digits::<u32>(value) {
                    Some(0) | None => return Err(err("invalid INTERVAL")),
                    Some(v) => interval = Some(v),
                }
            } else {
                other.push((name.to_ascii_uppercase(), value.to_string()));
            }
        }

        let freq = freq.ok_or_else(|| err("missing FREQ"))?;
        if until.is_some() && count.is_some() {
            return Err(err("UNTIL and COUNT are mutually exclusive"));
        }

        Ok(Self {
            freq,
            until,
            count,
            interval,
            other,
        })
    }
}

impl Display for ValueRecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KW_RRULE_FREQ}={}", self.freq)?;
        if let Some(interval) = self.interval {
            write!(f, ";{KW_RRULE_INTERVAL}={interval}")?;
        }
        if let Some(until) = self.until {
            write!(f, ";{KW_RRULE_UNTIL}={until}")?;
        }
        if let Some(count) = self.count {
            write!(f, ";{KW_RRULE_COUNT}={count}")?;
        }
        for (name, value) in &self.other {
            write!(f, ";{name}={value}")?;
        }
        Ok(())
    }
}
