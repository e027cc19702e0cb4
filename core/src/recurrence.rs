// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU32;

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp};

use crate::datetime::format_date;

/// How often a recurring event repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// The event does not repeat.
    #[default]
    None,

    /// Every `interval` days.
    Daily,

    /// Every `interval` weeks.
    Weekly,

    /// Every `interval` months, on the day of month of the first occurrence.
    Monthly,

    /// Every `interval` years.
    Yearly,
}

impl Frequency {
    /// Calendar span covering `units` steps of this frequency, `None` for
    /// [`Frequency::None`].
    ///
    /// # Errors
    ///
    /// Returns an error if the span is out of the supported range.
    pub fn span(self, units: i64) -> Result<Option<Span>, jiff::Error> {
        let span = match self {
            Self::None => return Ok(None),
            Self::Daily => Span::new().try_days(units)?,
            Self::Weekly => Span::new().try_weeks(units)?,
            Self::Monthly => Span::new().try_months(units)?,
            Self::Yearly => Span::new().try_years(units)?,
        };
        Ok(Some(span))
    }

    /// Upper bound of the length of one step in seconds, allowing for DST
    /// shifts, leap days and long months.
    pub(crate) const fn max_step_seconds(self) -> i64 {
        const HOUR: i64 = 3_600;
        const DAY: i64 = 24 * HOUR;
        match self {
            Self::None => 0,
            Self::Daily => DAY + HOUR,
            Self::Weekly => 7 * DAY + HOUR,
            Self::Monthly => 31 * DAY + HOUR,
            Self::Yearly => 366 * DAY + HOUR,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::None => write!(f, "none"),
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Yearly => write!(f, "yearly"),
        }
    }
}

/// A point in time as used by recurrence bounds, exception dates and
/// recurrence ids: a bare date for all-day events, an exact instant for
/// timed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Moment {
    /// A calendar date.
    Date(Date),

    /// An exact instant.
    Instant(Timestamp),
}

impl Moment {
    /// Whether this is a bare date.
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// The date of this moment as seen in the given zone.
    #[must_use]
    pub fn date_in(&self, tz: &TimeZone) -> Date {
        match self {
            Self::Date(date) => *date,
            Self::Instant(ts) => tz.to_datetime(*ts).date(),
        }
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Moment::Date(date) => f.write_str(&format_date(*date)),
            Moment::Instant(ts) => write!(f, "{ts}"),
        }
    }
}

impl From<Date> for Moment {
    fn from(date: Date) -> Self {
        Self::Date(date)
    }
}

impl From<Timestamp> for Moment {
    fn from(ts: Timestamp) -> Self {
        Self::Instant(ts)
    }
}

/// Immutable description of a repeating pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: NonZeroU32,
    until: Option<Moment>,
    count: Option<NonZeroU32>,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        Self::new(Frequency::None)
    }
}

impl RecurrenceRule {
    /// A rule repeating every single unit of `frequency`, without bound.
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: NonZeroU32::MIN,
            until: None,
            count: None,
        }
    }

    /// A rule that does not repeat.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(Frequency::None)
    }

    /// Repeat every `interval` units.
    #[must_use]
    pub const fn with_interval(mut self, interval: NonZeroU32) -> Self {
        self.interval = interval;
        self
    }

    /// Stop after `until`, inclusive.
    #[must_use]
    pub const fn with_until(mut self, until: Moment) -> Self {
        self.until = Some(until);
        self
    }

    /// Stop after `count` candidates, exception dates included.
    #[must_use]
    pub const fn with_count(mut self, count: NonZeroU32) -> Self {
        self.count = Some(count);
        self
    }

    /// How often the event repeats.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Number of frequency units between occurrences.
    #[must_use]
    pub const fn interval(&self) -> NonZeroU32 {
        self.interval
    }

    /// Inclusive upper bound for occurrence starts.
    #[must_use]
    pub const fn until(&self) -> Option<Moment> {
        self.until
    }

    /// Maximum number of generated candidates.
    #[must_use]
    pub const fn count(&self) -> Option<NonZeroU32> {
        self.count
    }

    /// Whether the rule produces anything beyond the master event.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        !matches!(self.frequency, Frequency::None)
    }
}

/// Ordered set of moments removed from an otherwise generated recurrence set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExceptionDates(BTreeSet<Moment>);

impl ExceptionDates {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add a moment, returning whether it was new.
    pub fn insert(&mut self, moment: Moment) -> bool {
        self.0.insert(moment)
    }

    /// Whether the moment is excluded.
    #[must_use]
    pub fn contains(&self, moment: &Moment) -> bool {
        self.0.contains(moment)
    }

    /// Number of excluded moments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Excluded moments in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Moment> {
        self.0.iter()
    }
}

impl FromIterator<Moment> for ExceptionDates {
    fn from_iter<I: IntoIterator<Item = Moment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Moment> for ExceptionDates {
    fn extend<I: IntoIterator<Item = Moment>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ExceptionDates {
    type Item = &'a Moment;
    type IntoIter = std::collections::btree_set::Iter<'a, Moment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
